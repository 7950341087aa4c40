mod stores;

use std::{sync::Arc, time::Duration};

use axum::{
    http::{header, HeaderName, Method},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use qdash_aggregate::{Aggregator, CachedStoreList, FetchPlan};
use qdash_core::AppConfig;
use qdash_upstream::{UpstreamClient, UpstreamError};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::middleware::{
    enforce_rate_limit, request_id, require_api_key, AuthState, RateLimitState,
};

pub type LiveAggregator =
    Aggregator<CachedStoreList<Arc<UpstreamClient>>, Arc<UpstreamClient>>;

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<LiveAggregator>,
}

impl AppState {
    /// Wires one shared upstream client into both feeds, with the store-list
    /// side behind a cache of `store_list_ttl`.
    #[must_use]
    pub fn new(client: UpstreamClient, plan: FetchPlan, store_list_ttl: Duration) -> Self {
        let client = Arc::new(client);
        let store_list = CachedStoreList::new(Arc::clone(&client), store_list_ttl);
        Self {
            aggregator: Arc::new(Aggregator::new(store_list, client, plan)),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, UpstreamError> {
        let client = UpstreamClient::from_config(config)?;
        Ok(Self::new(
            client,
            FetchPlan::from_config(config),
            Duration::from_secs(config.store_list_cache_secs),
        ))
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-api-key"),
            HeaderName::from_static("x-request-id"),
        ])
}

fn protected_router(auth: AuthState, rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/stores/live", get(stores::live_stores))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    rate_limit,
                    enforce_rate_limit,
                ))
                .layer(axum::middleware::from_fn_with_state(auth, require_api_key)),
        )
}

pub fn build_app(state: AppState, auth: AuthState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(protected_router(auth, rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(HealthData { status: "ok" })
}
