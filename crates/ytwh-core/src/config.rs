use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Largest ID group the batch-lookup endpoints accept in one call.
pub const MAX_BATCH_SIZE: usize = 50;

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
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
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

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            other => Err(invalid(var, format!("expected a boolean, got \"{other}\""))),
        }
    };

    let database_url = require("DATABASE_URL")?;
    let youtube_api_key = lookup("YOUTUBE_API_KEY").ok().filter(|k| !k.is_empty());

    let env = parse_environment(&or_default("YTWH_ENV", "development"))?;
    let log_level = or_default("YTWH_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("YTWH_DB_MAX_CONNECTIONS", "2")?;
    let db_min_connections = parse_u32("YTWH_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("YTWH_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let api_base_url = or_default(
        "YTWH_API_BASE_URL",
        "https://www.googleapis.com/youtube/v3/",
    );
    let api_timeout_secs = parse_u64("YTWH_API_TIMEOUT_SECS", "30")?;
    let api_user_agent = or_default("YTWH_API_USER_AGENT", "ytwh/0.1 (warehouse-etl)");
    let region_code = or_default("YTWH_REGION_CODE", "US");
    let language = or_default("YTWH_LANGUAGE", "en");

    let batch_size = or_default("YTWH_BATCH_SIZE", "50")
        .parse::<usize>()
        .map_err(|e| invalid("YTWH_BATCH_SIZE", e.to_string()))?;
    if batch_size == 0 || batch_size > MAX_BATCH_SIZE {
        return Err(invalid(
            "YTWH_BATCH_SIZE",
            format!("must be between 1 and {MAX_BATCH_SIZE}, got {batch_size}"),
        ));
    }

    let handoff_path = PathBuf::from(or_default(
        "YTWH_HANDOFF_PATH",
        "./data/unique_channel_ids.txt",
    ));
    let truncate_duration_days = parse_bool("YTWH_TRUNCATE_DURATION_DAYS", "false")?;

    Ok(AppConfig {
        database_url,
        env,
        log_level,
        youtube_api_key,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        api_base_url,
        api_timeout_secs,
        api_user_agent,
        region_code,
        language,
        batch_size,
        handoff_path,
        truncate_duration_days,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "YTWH_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
