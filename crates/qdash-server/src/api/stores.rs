use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::Utc;
use qdash_aggregate::LiveStoresResponse;
use qdash_core::StoreListParams;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::AppState;

/// Raw query string. Every field is kept as text so that a malformed value
/// falls back to its default instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub(super) struct LiveStoresQuery {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub numresults: Option<String>,
    pub region: Option<String>,
}

impl LiveStoresQuery {
    fn into_params(self) -> StoreListParams {
        StoreListParams::from_optional(
            parse_lenient(self.latitude.as_deref()),
            parse_lenient(self.longitude.as_deref()),
            parse_lenient(self.numresults.as_deref()),
            self.region,
        )
    }
}

fn parse_lenient<T: std::str::FromStr>(raw: Option<&str>) -> Option<T> {
    raw.and_then(|v| v.trim().parse().ok())
}

pub(super) async fn live_stores(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<LiveStoresQuery>,
) -> Response {
    let params = query.into_params();

    let envelope = match Arc::clone(&state.aggregator).run_isolated(params).await {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::error!(request_id = %req_id.0, error = %e, "live stores aggregation failed");
            LiveStoresResponse::internal_error(Utc::now())
        }
    };

    let status = StatusCode::from_u16(envelope.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    tracing::info!(
        request_id = %req_id.0,
        status = status.as_u16(),
        stores = envelope.data.len(),
        "live stores request complete"
    );
    (status, Json(envelope)).into_response()
}
