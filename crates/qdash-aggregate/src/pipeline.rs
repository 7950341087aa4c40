//! End-to-end aggregation for one request.

use std::sync::Arc;

use chrono::Utc;
use qdash_core::StoreListParams;

use crate::classify::{classify, StoreListOutcome};
use crate::envelope::LiveStoresResponse;
use crate::error::AggregateError;
use crate::merge::merge_stores;
use crate::orchestrator::{fetch_queues, FetchPlan};
use crate::source::{QueueSource, StoreListSource};

/// Runs one full aggregation and returns the envelope to send.
///
/// Every call re-fetches everything; nothing is shared between calls except
/// whatever caching the `store_list` source does on its own.
pub async fn aggregate<S, Q>(
    store_list: &S,
    queues: &Q,
    params: &StoreListParams,
    plan: &FetchPlan,
) -> LiveStoresResponse
where
    S: StoreListSource,
    Q: QueueSource,
{
    tracing::info!(
        latitude = params.latitude,
        longitude = params.longitude,
        numresults = params.numresults,
        region = %params.region,
        "fetching live store data"
    );

    let rows = match store_list.fetch_store_list(params).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch store list");
            let classification = classify(StoreListOutcome::Unavailable, 0);
            return LiveStoresResponse::build(classification, Vec::new(), &[], Utc::now());
        }
    };

    if rows.is_empty() {
        tracing::warn!(region = %params.region, "store list returned no stores");
        let classification = classify(StoreListOutcome::Fetched { stores: 0 }, 0);
        return LiveStoresResponse::build(classification, Vec::new(), &[], Utc::now());
    }

    let report = fetch_queues(queues, &rows, &params.region, plan).await;
    let now = Utc::now();
    let stores = merge_stores(&rows, &report.outcomes, now);
    // Per row, not per distinct id: repeated ids share one lookup.
    let with_queue = rows
        .iter()
        .filter(|row| matches!(report.outcomes.get(&row.id), Some(Some(_))))
        .count();

    tracing::info!(
        stores = stores.len(),
        queue_hits = with_queue,
        queue_errors = report.errors.len(),
        "aggregated live store data"
    );

    let classification = classify(
        StoreListOutcome::Fetched {
            stores: stores.len(),
        },
        with_queue,
    );
    LiveStoresResponse::build(classification, stores, &report.errors, now)
}

/// Long-lived handle bundling both sources with a fetch plan.
#[derive(Debug)]
pub struct Aggregator<S, Q> {
    store_list: S,
    queues: Q,
    plan: FetchPlan,
}

impl<S, Q> Aggregator<S, Q>
where
    S: StoreListSource + 'static,
    Q: QueueSource + 'static,
{
    #[must_use]
    pub fn new(store_list: S, queues: Q, plan: FetchPlan) -> Self {
        Self {
            store_list,
            queues,
            plan,
        }
    }

    pub async fn run(&self, params: &StoreListParams) -> LiveStoresResponse {
        aggregate(&self.store_list, &self.queues, params, &self.plan).await
    }

    /// Runs the aggregation on its own task so a panic anywhere inside it
    /// surfaces as an error instead of tearing down the caller.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError::Join`] if the task panicked or was cancelled.
    pub async fn run_isolated(
        self: Arc<Self>,
        params: StoreListParams,
    ) -> Result<LiveStoresResponse, AggregateError> {
        let handle = tokio::spawn(async move { self.run(&params).await });
        Ok(handle.await?)
    }
}
