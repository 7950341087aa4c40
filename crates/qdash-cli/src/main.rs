mod snapshot;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "qdash-cli")]
#[command(about = "Store queue dashboard command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch one live snapshot of every store and its queue
    Snapshot {
        /// Latitude to search around
        #[arg(long)]
        latitude: Option<f64>,
        /// Longitude to search around
        #[arg(long)]
        longitude: Option<f64>,
        /// Maximum number of stores to request
        #[arg(long)]
        numresults: Option<u32>,
        /// Region code (e.g., HK)
        #[arg(long)]
        region: Option<String>,
        /// Print headline figures and a per-store table instead of JSON
        #[arg(long)]
        summary: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Snapshot {
            latitude,
            longitude,
            numresults,
            region,
            summary,
        }) => {
            let config = qdash_core::load_app_config()?;
            let params =
                qdash_core::StoreListParams::from_optional(latitude, longitude, numresults, region);
            snapshot::run_snapshot(&config, &params, summary).await
        }
        None => {
            println!("qdash-cli ready; try `qdash-cli snapshot --summary`");
            Ok(())
        }
    }
}
