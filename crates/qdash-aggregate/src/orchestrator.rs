//! Bounded-concurrency queue fan-out.
//!
//! Store ids are split into fixed-size chunks. Chunks run strictly one after
//! another; inside a chunk every queue lookup runs concurrently and the chunk
//! only completes once all of them have resolved. A short pause separates
//! chunks so the queue feed never sees more than `chunk_size` requests at once.
//!
//! A failing store never affects its neighbours: errors and timeouts are
//! folded into that store's [`QueueFetchOutcome`] and the batch carries on.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use futures::future::join_all;
use qdash_core::{AppConfig, RawQueueEntry, RawStoreListEntry};
use serde::Serialize;

use crate::source::QueueSource;

pub const DEFAULT_CHUNK_SIZE: usize = 5;
pub const DEFAULT_INTER_CHUNK_DELAY: Duration = Duration::from_millis(100);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Pacing for one fan-out run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPlan {
    /// Maximum queue requests in flight. Zero is treated as one.
    pub chunk_size: usize,
    pub inter_chunk_delay: Duration,
    /// Upper bound on a single store's lookup.
    pub request_timeout: Duration,
}

impl Default for FetchPlan {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            inter_chunk_delay: DEFAULT_INTER_CHUNK_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl FetchPlan {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            chunk_size: config.queue_chunk_size,
            inter_chunk_delay: Duration::from_millis(config.inter_chunk_delay_ms),
            request_timeout: Duration::from_secs(config.upstream_timeout_secs),
        }
    }

    fn effective_chunk_size(&self) -> usize {
        self.chunk_size.max(1)
    }
}

/// Result of one store's queue lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueFetchOutcome {
    pub store_id: i64,
    pub queue: Option<RawQueueEntry>,
    pub error: Option<String>,
}

/// A per-store queue failure as reported to the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueError {
    pub store_id: i64,
    pub error: String,
}

/// Everything the merge and classification steps need from the fan-out.
#[derive(Debug, Default)]
pub struct QueueFetchReport {
    /// Keyed by store id; `None` for stores without queue data.
    pub outcomes: HashMap<i64, Option<RawQueueEntry>>,
    /// In store-list order.
    pub errors: Vec<QueueError>,
    /// Stores for which queue data was returned.
    pub successful: usize,
}

impl QueueFetchReport {
    fn record(&mut self, outcome: QueueFetchOutcome) {
        if outcome.queue.is_some() {
            self.successful += 1;
        }
        if let Some(error) = outcome.error {
            self.errors.push(QueueError {
                store_id: outcome.store_id,
                error,
            });
        }
        self.outcomes.insert(outcome.store_id, outcome.queue);
    }
}

/// Fetches queue data for every distinct store id in `stores`.
///
/// Each id is looked up once, in first-seen order, even if the store list
/// repeats it.
pub async fn fetch_queues<Q: QueueSource>(
    source: &Q,
    stores: &[RawStoreListEntry],
    region: &str,
    plan: &FetchPlan,
) -> QueueFetchReport {
    let mut seen = HashSet::with_capacity(stores.len());
    let store_ids: Vec<i64> = stores
        .iter()
        .map(|s| s.id)
        .filter(|id| seen.insert(*id))
        .collect();

    let chunk_size = plan.effective_chunk_size();
    let chunk_count = store_ids.len().div_ceil(chunk_size);
    let mut report = QueueFetchReport::default();

    for (index, chunk) in store_ids.chunks(chunk_size).enumerate() {
        let pending: Vec<_> = chunk
            .iter()
            .map(|&store_id| fetch_one(source, store_id, region, plan.request_timeout))
            .collect();
        let outcomes = join_all(pending).await;

        for outcome in outcomes {
            report.record(outcome);
        }

        if index + 1 < chunk_count && !plan.inter_chunk_delay.is_zero() {
            tokio::time::sleep(plan.inter_chunk_delay).await;
        }
    }

    if !report.errors.is_empty() {
        tracing::warn!(
            failed = report.errors.len(),
            total = store_ids.len(),
            "queue fetch errors for some stores"
        );
    }

    report
}

async fn fetch_one<Q: QueueSource>(
    source: &Q,
    store_id: i64,
    region: &str,
    timeout: Duration,
) -> QueueFetchOutcome {
    let (queue, error) =
        match tokio::time::timeout(timeout, source.fetch_queue(store_id, region)).await {
            Ok(Ok(queue)) => (queue, None),
            Ok(Err(e)) => {
                tracing::warn!(store_id, error = %e, "failed to fetch queue for store");
                (None, Some(e.to_string()))
            }
            Err(_) => {
                tracing::warn!(
                    store_id,
                    timeout_ms = timeout.as_millis(),
                    "queue fetch timed out"
                );
                (
                    None,
                    Some(format!(
                        "queue request timed out after {}ms",
                        timeout.as_millis()
                    )),
                )
            }
        };

    QueueFetchOutcome {
        store_id,
        queue,
        error,
    }
}
