use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_BASE_URL: &str = "https://api.surmado.com/v1";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files, which suits tests
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation are decoupled from the process environment so they
/// can be tested with a plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::{Ipv4Addr, SocketAddr};
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("SURMADO_ENV", "development"))
        .ok_or_else(|| invalid("SURMADO_ENV", "expected development, test or production".into()))?;

    let api_key = lookup("SURMADO_API_KEY")
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty());

    let base_url = or_default("SURMADO_BASE_URL", DEFAULT_BASE_URL);
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(invalid(
            "SURMADO_BASE_URL",
            format!("expected an http(s) URL, got '{base_url}'"),
        ));
    }

    let port = or_default("PORT", "8080")
        .parse::<u16>()
        .map_err(|e| invalid("PORT", e.to_string()))?;
    let bind_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));

    let webhook_path = or_default("SURMADO_WEBHOOK_PATH", "/webhook");
    if !webhook_path.starts_with('/') || webhook_path.len() < 2 || webhook_path == "/health" {
        return Err(invalid(
            "SURMADO_WEBHOOK_PATH",
            format!("expected a path such as /webhook, got '{webhook_path}'"),
        ));
    }
    // The path is routed literally; capture and wildcard syntax is refused.
    if webhook_path.contains(['{', '}', '*']) || webhook_path.contains("/:") {
        return Err(invalid(
            "SURMADO_WEBHOOK_PATH",
            format!("route parameters are not allowed, got '{webhook_path}'"),
        ));
    }

    let log_level = or_default("SURMADO_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("SURMADO_REQUEST_TIMEOUT_SECS", "30")?;
    let max_retries = parse_u32("SURMADO_MAX_RETRIES", "3")?;
    let retry_backoff_base_ms = parse_u64("SURMADO_RETRY_BACKOFF_BASE_MS", "1000")?;

    let poll_interval_secs = parse_u64("SURMADO_POLL_INTERVAL_SECS", "30")?;
    if poll_interval_secs == 0 {
        return Err(invalid(
            "SURMADO_POLL_INTERVAL_SECS",
            "must be at least 1 second".into(),
        ));
    }
    let poll_timeout_mins = parse_u64("SURMADO_POLL_TIMEOUT_MINS", "20")?;

    let download_dir = lookup("SURMADO_DOWNLOAD_DIR")
        .ok()
        .filter(|d| !d.trim().is_empty())
        .map(PathBuf::from);
    let download_queue_capacity = parse_usize("SURMADO_DOWNLOAD_QUEUE", "64")?;
    if download_queue_capacity == 0 {
        return Err(invalid("SURMADO_DOWNLOAD_QUEUE", "must be at least 1".into()));
    }

    Ok(AppConfig {
        env,
        api_key,
        base_url,
        bind_addr,
        webhook_path,
        log_level,
        request_timeout_secs,
        max_retries,
        retry_backoff_base_ms,
        poll_interval_secs,
        poll_timeout_mins,
        download_dir,
        download_queue_capacity,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Option<Environment> {
    match s {
        "development" => Some(Environment::Development),
        "test" => Some(Environment::Test),
        "production" => Some(Environment::Production),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
