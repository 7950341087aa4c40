//! JSON envelope returned by the live stores endpoint.

use chrono::{DateTime, Utc};
use qdash_core::Store;
use serde::Serialize;

use crate::classify::Classification;
use crate::orchestrator::QueueError;

/// Cap on `queueErrors` entries so a bad upstream cannot bloat the payload.
pub const MAX_REPORTED_QUEUE_ERRORS: usize = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStoresResponse {
    /// HTTP status to send with this body.
    #[serde(skip)]
    pub status: u16,
    pub success: bool,
    pub data: Vec<Store>,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial_data: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_errors: Option<Vec<QueueError>>,
}

impl LiveStoresResponse {
    /// Shapes the envelope for a classified aggregation.
    ///
    /// Store data is dropped for the two roster-failure tiers regardless of
    /// what `stores` holds.
    #[must_use]
    pub fn build(
        classification: Classification,
        stores: Vec<Store>,
        queue_errors: &[QueueError],
        now: DateTime<Utc>,
    ) -> Self {
        let data = match classification {
            Classification::Success { .. } | Classification::PartialSuccess { .. } => stores,
            Classification::StoreListUnavailable | Classification::NoStoresFound => Vec::new(),
        };

        let (warnings, partial_data) = match classification {
            Classification::PartialSuccess { stores } => (
                Some(vec![format!("Queue data unavailable for {stores} stores")]),
                Some(true),
            ),
            _ => (None, None),
        };

        let queue_errors = (!queue_errors.is_empty()).then(|| {
            queue_errors
                .iter()
                .take(MAX_REPORTED_QUEUE_ERRORS)
                .cloned()
                .collect()
        });

        Self {
            status: classification.status_code(),
            success: classification.is_success(),
            data,
            timestamp: now,
            message: classification.message(),
            error: classification.error_code().map(str::to_string),
            warnings,
            partial_data,
            queue_errors,
        }
    }

    /// Failure envelope with no store data.
    #[must_use]
    pub fn failure(status: u16, code: &str, message: &str, now: DateTime<Utc>) -> Self {
        Self {
            status,
            success: false,
            data: Vec::new(),
            timestamp: now,
            message: message.to_string(),
            error: Some(code.to_string()),
            warnings: None,
            partial_data: None,
            queue_errors: None,
        }
    }

    /// Generic 500 body; never carries details of the underlying failure.
    #[must_use]
    pub fn internal_error(now: DateTime<Utc>) -> Self {
        Self::failure(
            500,
            "INTERNAL_SERVER_ERROR",
            "An unexpected error occurred. Please try again later.",
            now,
        )
    }
}
