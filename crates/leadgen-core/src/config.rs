use crate::app_config::{AppConfig, Environment};
use crate::{ConfigError, FlagMode};

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
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

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

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let outscraper_api_key = require("OUTSCRAPER_API_KEY")?;

    let env = parse_environment(&or_default("LEADGEN_ENV", "development"));
    let bind_addr = parse_addr("LEADGEN_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("LEADGEN_LOG_LEVEL", "info");
    let leads_path = PathBuf::from(or_default("LEADGEN_LEADS_PATH", "leadsData.json"));

    let provider_base_url = or_default(
        "LEADGEN_PROVIDER_BASE_URL",
        "https://api.app.outscraper.com",
    );
    let language = or_default("LEADGEN_LANGUAGE", "en");
    let region = or_default("LEADGEN_REGION", "IN");

    let request_timeout_secs = parse_u64("LEADGEN_REQUEST_TIMEOUT_SECS", "30")?;
    let poll_interval_secs = parse_u64("LEADGEN_POLL_INTERVAL_SECS", "5")?;
    let poll_max_attempts = parse_u32("LEADGEN_POLL_MAX_ATTEMPTS", "120")?;
    if poll_max_attempts == 0 {
        return Err(invalid(
            "LEADGEN_POLL_MAX_ATTEMPTS",
            "must be at least 1".to_string(),
        ));
    }
    let max_retries = parse_u32("LEADGEN_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("LEADGEN_RETRY_BACKOFF_BASE_MS", "1000")?;

    let flag_mode = match parse_bool(&or_default("LEADGEN_AGGREGATOR_FLAGS", "true")) {
        Some(true) => FlagMode::Enabled,
        Some(false) => FlagMode::Disabled,
        None => {
            return Err(invalid(
                "LEADGEN_AGGREGATOR_FLAGS",
                "expected true or false".to_string(),
            ))
        }
    };

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        leads_path,
        outscraper_api_key,
        provider_base_url,
        language,
        region,
        request_timeout_secs,
        poll_interval_secs,
        poll_max_attempts,
        max_retries,
        retry_backoff_base_ms,
        flag_mode,
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

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
