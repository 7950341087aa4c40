use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it from a
/// plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let store_list_url = require("QDASH_STORE_LIST_URL")?;
    let queue_url = require("QDASH_QUEUE_URL")?;

    let env = parse_environment(&or_default("QDASH_ENV", "development"));
    let bind_addr = parse_addr("QDASH_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("QDASH_LOG_LEVEL", "info");

    let upstream_timeout_secs = parse_u64("QDASH_UPSTREAM_TIMEOUT_SECS", "5")?;
    if upstream_timeout_secs == 0 {
        return Err(invalid(
            "QDASH_UPSTREAM_TIMEOUT_SECS",
            "must be at least 1".to_string(),
        ));
    }
    let user_agent = or_default("QDASH_USER_AGENT", "qdash/0.1 (queue-dashboard)");
    let queue_chunk_size = parse_usize("QDASH_QUEUE_CHUNK_SIZE", "5")?;
    if queue_chunk_size == 0 {
        return Err(invalid(
            "QDASH_QUEUE_CHUNK_SIZE",
            "must be at least 1".to_string(),
        ));
    }
    let inter_chunk_delay_ms = parse_u64("QDASH_INTER_CHUNK_DELAY_MS", "100")?;
    let store_list_cache_secs = parse_u64("QDASH_STORE_LIST_CACHE_SECS", "30")?;

    let api_key = lookup("QDASH_API_KEY")
        .ok()
        .filter(|v| !v.trim().is_empty());
    let rate_limit_window_ms = parse_u64("QDASH_RATE_LIMIT_WINDOW_MS", "60000")?;
    let rate_limit_max_requests = parse_usize("QDASH_RATE_LIMIT_MAX_REQUESTS", "100")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        store_list_url,
        queue_url,
        upstream_timeout_secs,
        user_agent,
        queue_chunk_size,
        inter_chunk_delay_ms,
        store_list_cache_secs,
        api_key,
        rate_limit_window_ms,
        rate_limit_max_requests,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
