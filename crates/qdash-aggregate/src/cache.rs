//! Short-lived cache in front of the store-list feed.
//!
//! The roster changes rarely compared to queues, so successful responses are
//! reused for a few seconds per distinct query. Failures are never cached.

use std::collections::HashMap;
use std::time::Duration;

use qdash_core::{RawStoreListEntry, StoreListParams};
use qdash_upstream::UpstreamError;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::source::StoreListSource;

#[derive(Debug)]
struct CachedRoster {
    fetched_at: Instant,
    rows: Vec<RawStoreListEntry>,
}

#[derive(Debug)]
pub struct CachedStoreList<S> {
    inner: S,
    ttl: Duration,
    entries: Mutex<HashMap<String, CachedRoster>>,
}

impl<S: StoreListSource> CachedStoreList<S> {
    /// A zero `ttl` disables caching.
    #[must_use]
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    async fn cached(&self, key: &str) -> Option<Vec<RawStoreListEntry>> {
        let entries = self.entries.lock().await;
        entries
            .get(key)
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| entry.rows.clone())
    }

    async fn store(&self, key: String, rows: &[RawStoreListEntry]) {
        let mut entries = self.entries.lock().await;
        let ttl = self.ttl;
        entries.retain(|_, entry| entry.fetched_at.elapsed() < ttl);
        entries.insert(
            key,
            CachedRoster {
                fetched_at: Instant::now(),
                rows: rows.to_vec(),
            },
        );
    }
}

impl<S: StoreListSource> StoreListSource for CachedStoreList<S> {
    async fn fetch_store_list(
        &self,
        params: &StoreListParams,
    ) -> Result<Vec<RawStoreListEntry>, UpstreamError> {
        if self.ttl.is_zero() {
            return self.inner.fetch_store_list(params).await;
        }

        let key = params.cache_key();
        if let Some(rows) = self.cached(&key).await {
            tracing::debug!(key = %key, "store list served from cache");
            return Ok(rows);
        }

        let rows = self.inner.fetch_store_list(params).await?;
        self.store(key, &rows).await;
        Ok(rows)
    }
}
