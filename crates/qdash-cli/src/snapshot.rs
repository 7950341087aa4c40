//! One-shot aggregation for the terminal.

use std::fmt::Write as _;

use qdash_aggregate::{aggregate, FetchPlan, LiveStoresResponse};
use qdash_core::{AppConfig, DashboardSummary, StoreListParams};
use qdash_upstream::UpstreamClient;

/// Runs a single aggregation and prints it.
///
/// # Errors
///
/// Returns an error if the upstream client cannot be built, if the envelope
/// cannot be serialized, or if the aggregation ended in a 5xx outcome (the
/// envelope is still printed first).
pub(crate) async fn run_snapshot(
    config: &AppConfig,
    params: &StoreListParams,
    summary: bool,
) -> anyhow::Result<()> {
    let client = UpstreamClient::from_config(config)?;
    let plan = FetchPlan::from_config(config);

    let response = aggregate(&client, &client, params, &plan).await;
    tracing::debug!(
        status = response.status,
        stores = response.data.len(),
        "snapshot aggregated"
    );

    if summary {
        print!("{}", render_summary(&response));
    } else {
        println!("{}", serde_json::to_string_pretty(&response)?);
    }

    if response.status >= 500 {
        anyhow::bail!(
            "snapshot failed with status {}: {}",
            response.status,
            response.message
        );
    }
    Ok(())
}

/// Headline figures followed by one line per store.
pub(crate) fn render_summary(response: &LiveStoresResponse) -> String {
    let stats = DashboardSummary::from_stores(&response.data);
    let mut out = String::new();

    let _ = writeln!(out, "status:   {} ({})", response.status, response.message);
    let _ = writeln!(
        out,
        "stores:   {} total, {} open",
        stats.total_stores, stats.open_stores
    );
    let _ = writeln!(
        out,
        "waiting:  {} groups, {} tickets called",
        stats.total_waiting, stats.total_queue_tickets
    );
    if let Some(busiest) = stats.busiest_store {
        let _ = writeln!(out, "busiest:  store {busiest}");
    }

    if !response.data.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{:>6}  {:<8}  {:>7}  {:<8}  {}",
            "id", "status", "waiting", "priority", "name"
        );
        for store in &response.data {
            let name = if store.name_en.is_empty() {
                &store.name
            } else {
                &store.name_en
            };
            let _ = writeln!(
                out,
                "{:>6}  {:<8}  {:>7}  {:<8}  {}",
                store.shop_id,
                store.store_status,
                store.waiting_group,
                store.priority().as_str(),
                name
            );
        }
    }

    if let Some(errors) = &response.queue_errors {
        let _ = writeln!(out);
        for error in errors {
            let _ = writeln!(out, "queue error: store {}: {}", error.store_id, error.error);
        }
    }

    out
}
