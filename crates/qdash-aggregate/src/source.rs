//! Seams between the aggregation pipeline and the upstream feeds.
//!
//! [`UpstreamClient`] implements both traits for production; tests plug in
//! in-memory fakes.

use std::future::Future;
use std::sync::Arc;

use qdash_core::{RawQueueEntry, RawStoreListEntry, StoreListParams};
use qdash_upstream::{UpstreamClient, UpstreamError};

pub trait StoreListSource: Send + Sync {
    fn fetch_store_list(
        &self,
        params: &StoreListParams,
    ) -> impl Future<Output = Result<Vec<RawStoreListEntry>, UpstreamError>> + Send;
}

pub trait QueueSource: Send + Sync {
    /// `Ok(None)` means the store has no queue right now; it is not a failure.
    fn fetch_queue(
        &self,
        store_id: i64,
        region: &str,
    ) -> impl Future<Output = Result<Option<RawQueueEntry>, UpstreamError>> + Send;
}

impl StoreListSource for UpstreamClient {
    fn fetch_store_list(
        &self,
        params: &StoreListParams,
    ) -> impl Future<Output = Result<Vec<RawStoreListEntry>, UpstreamError>> + Send {
        UpstreamClient::fetch_store_list(self, params)
    }
}

impl QueueSource for UpstreamClient {
    fn fetch_queue(
        &self,
        store_id: i64,
        region: &str,
    ) -> impl Future<Output = Result<Option<RawQueueEntry>, UpstreamError>> + Send {
        self.fetch_store_queue(store_id, region)
    }
}

impl<T: StoreListSource> StoreListSource for Arc<T> {
    fn fetch_store_list(
        &self,
        params: &StoreListParams,
    ) -> impl Future<Output = Result<Vec<RawStoreListEntry>, UpstreamError>> + Send {
        T::fetch_store_list(self, params)
    }
}

impl<T: QueueSource> QueueSource for Arc<T> {
    fn fetch_queue(
        &self,
        store_id: i64,
        region: &str,
    ) -> impl Future<Output = Result<Option<RawQueueEntry>, UpstreamError>> + Send {
        T::fetch_queue(self, store_id, region)
    }
}
