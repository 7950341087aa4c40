use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use qdash_aggregate::LiveStoresResponse;
use qdash_core::AppConfig;
use subtle::ConstantTimeEq;
use tokio::{sync::Mutex, time::Instant};
use uuid::Uuid;

const API_KEY_HEADER: &str = "x-api-key";
const UNKNOWN_CLIENT: &str = "unknown";

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Shared-secret API key check. Disabled when no key is configured.
#[derive(Clone)]
pub struct AuthState {
    api_key: Option<Arc<str>>,
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("enabled", &self.enabled())
            .finish()
    }
}

impl AuthState {
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key
                .map(|k| k.trim().to_owned())
                .filter(|k| !k.is_empty())
                .map(Arc::from),
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let auth = Self::new(config.api_key.clone());
        if !auth.enabled() {
            tracing::warn!("QDASH_API_KEY not set; API key validation disabled");
        }
        auth
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.api_key.is_some()
    }

    fn allows(&self, candidate: &str) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| bool::from(key.as_bytes().ct_eq(candidate.as_bytes())))
    }
}

#[derive(Debug, Clone, Copy)]
struct RateLimitWindow {
    started_at: Instant,
    count: usize,
}

/// Fixed-window limiter with one window per client.
///
/// Clients are identified by `x-forwarded-for`, then `x-real-ip`; everything
/// else shares the `"unknown"` bucket. State is process-local.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    clients: Arc<Mutex<HashMap<String, RateLimitWindow>>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            clients: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.rate_limit_max_requests,
            Duration::from_millis(config.rate_limit_window_ms),
        )
    }

    /// Counts one request for `client`; returns `false` once the window is full.
    async fn admit(&self, client: &str) -> bool {
        let mut clients = self.clients.lock().await;
        let now = Instant::now();

        if let Some(window) = clients.get_mut(client) {
            if now.duration_since(window.started_at) < self.window {
                if window.count >= self.max_requests {
                    return false;
                }
                window.count += 1;
                return true;
            }
        }

        let ttl = self.window;
        clients.retain(|_, w| now.duration_since(w.started_at) < ttl);
        clients.insert(
            client.to_owned(),
            RateLimitWindow {
                started_at: now,
                count: 1,
            },
        );
        self.max_requests > 0
    }
}

fn reject(status: StatusCode, code: &str, message: &str) -> Response {
    let body = LiveStoresResponse::failure(status.as_u16(), code, message, Utc::now());
    (status, Json(body)).into_response()
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware enforcing the `x-api-key` header when a key is configured.
pub async fn require_api_key(State(auth): State<AuthState>, req: Request, next: Next) -> Response {
    if !auth.enabled() {
        return next.run(req).await;
    }

    let provided = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    match provided {
        Some(key) if auth.allows(key) => next.run(req).await,
        Some(_) => {
            tracing::warn!("rejected request with invalid API key");
            reject(
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Access denied. Valid API key required.",
            )
        }
        None => {
            tracing::debug!("rejected request without API key");
            reject(
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Access denied. Valid API key required.",
            )
        }
    }
}

/// Middleware enforcing a fixed request-per-window limit per client.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let client = client_key(req.headers());

    if !rate_limit.admit(&client).await {
        tracing::warn!(client = %client, "rate limit exceeded");
        return reject(
            StatusCode::TOO_MANY_REQUESTS,
            "RATE_LIMIT_EXCEEDED",
            "Too many requests. Please try again later.",
        );
    }

    next.run(req).await
}

fn client_key(headers: &HeaderMap) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    header("x-forwarded-for")
        .or_else(|| header("x-real-ip"))
        .unwrap_or(UNKNOWN_CLIENT)
        .to_owned()
}
