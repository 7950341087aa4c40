//! Live store aggregation: fetch the roster, fan out queue lookups in bounded
//! chunks, merge, classify, and shape the dashboard envelope.

pub mod cache;
pub mod classify;
pub mod envelope;
pub mod error;
pub mod merge;
pub mod orchestrator;
pub mod pipeline;
pub mod source;

pub use cache::CachedStoreList;
pub use classify::{classify, Classification, StoreListOutcome};
pub use envelope::{LiveStoresResponse, MAX_REPORTED_QUEUE_ERRORS};
pub use error::AggregateError;
pub use merge::merge_stores;
pub use orchestrator::{fetch_queues, FetchPlan, QueueError, QueueFetchOutcome, QueueFetchReport};
pub use pipeline::{aggregate, Aggregator};
pub use source::{QueueSource, StoreListSource};
