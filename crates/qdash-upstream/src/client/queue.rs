//! Per-store queue fetch for `UpstreamClient`.

use qdash_core::RawQueueEntry;

use crate::error::UpstreamError;

use super::UpstreamClient;

impl UpstreamClient {
    /// Fetches the live ticket queue for one store.
    ///
    /// A 404 means the store has no active queue right now and yields
    /// `Ok(None)`, as does a literal `null` body.
    ///
    /// # Errors
    ///
    /// - [`UpstreamError::UnexpectedStatus`] for any non-2xx response other than 404.
    /// - [`UpstreamError::Http`] on network failure or timeout.
    /// - [`UpstreamError::Deserialize`] if the body does not match the queue shape.
    pub async fn fetch_store_queue(
        &self,
        store_id: i64,
        region: &str,
    ) -> Result<Option<RawQueueEntry>, UpstreamError> {
        let url = self.queue_request_url(store_id, region);
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!(store_id, "queue feed has no data for store");
            return Ok(None);
        }

        if !status.is_success() {
            return Err(UpstreamError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<Option<RawQueueEntry>>(&body).map_err(|e| {
            UpstreamError::Deserialize {
                context: format!("queue for store {store_id}"),
                source: e,
            }
        })
    }
}
