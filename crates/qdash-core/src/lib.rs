pub mod app_config;
pub mod config;
pub mod store;
pub mod summary;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use store::{
    QueuePriority, RawQueueEntry, RawStoreListEntry, Store, StoreListParams, StoreStatus,
};
pub use summary::DashboardSummary;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
