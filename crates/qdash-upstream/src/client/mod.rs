//! HTTP client for the store-list and per-store queue feeds.

mod queue;
mod store_list;

use std::time::Duration;

use qdash_core::{AppConfig, StoreListParams};
use reqwest::{Client, Url};

use crate::error::UpstreamError;

/// Client for both upstream feeds.
///
/// Each call issues exactly one request; nothing is retried here. The
/// per-request timeout configured on the inner `reqwest::Client` bounds how
/// long a single slow store can hold up its caller.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    store_list_url: Url,
    queue_url: Url,
}

impl UpstreamClient {
    /// Creates a client with the given feed endpoints, timeout, and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::InvalidUrl`] if either endpoint does not parse,
    /// or [`UpstreamError::Http`] if the underlying `reqwest::Client` cannot be
    /// constructed.
    pub fn new(
        store_list_url: &str,
        queue_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            store_list_url: parse_endpoint(store_list_url)?,
            queue_url: parse_endpoint(queue_url)?,
        })
    }

    /// Builds a client from the endpoint and timeout settings in `config`.
    ///
    /// # Errors
    ///
    /// See [`UpstreamClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, UpstreamError> {
        Self::new(
            &config.store_list_url,
            &config.queue_url,
            config.upstream_timeout_secs,
            &config.user_agent,
        )
    }

    fn store_list_request_url(&self, params: &StoreListParams) -> Url {
        let mut url = self.store_list_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params.query_pairs() {
                pairs.append_pair(key, &value);
            }
        }
        url
    }

    fn queue_request_url(&self, store_id: i64, region: &str) -> Url {
        let mut url = self.queue_url.clone();
        url.query_pairs_mut()
            .append_pair("region", region)
            .append_pair("storeid", &store_id.to_string());
        url
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, UpstreamError> {
    let url = Url::parse(raw.trim()).map_err(|e| UpstreamError::InvalidUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(UpstreamError::InvalidUrl {
            url: raw.to_owned(),
            reason: format!("unsupported scheme \"{}\"", url.scheme()),
        });
    }
    Ok(url)
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
