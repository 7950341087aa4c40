//! Store-list fetch for `UpstreamClient`.

use qdash_core::{RawStoreListEntry, StoreListParams};

use crate::error::UpstreamError;

use super::UpstreamClient;

impl UpstreamClient {
    /// Fetches the store roster near the given coordinate.
    ///
    /// The whole aggregation depends on this call, so every failure is
    /// returned to the caller as-is.
    ///
    /// # Errors
    ///
    /// - [`UpstreamError::UnexpectedStatus`] for any non-2xx response.
    /// - [`UpstreamError::Http`] on network failure or timeout.
    /// - [`UpstreamError::Deserialize`] if the body is not a JSON array of
    ///   store rows.
    pub async fn fetch_store_list(
        &self,
        params: &StoreListParams,
    ) -> Result<Vec<RawStoreListEntry>, UpstreamError> {
        let url = self.store_list_request_url(params);
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            return Err(UpstreamError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<Vec<RawStoreListEntry>>(&body).map_err(|e| {
            UpstreamError::Deserialize {
                context: format!("store list (region={})", params.region),
                source: e,
            }
        })
    }
}
