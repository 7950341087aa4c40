use thiserror::Error;

#[derive(Debug, Error)]
pub enum AggregateError {
    /// The aggregation task panicked or was cancelled before producing a response.
    #[error("aggregation task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
