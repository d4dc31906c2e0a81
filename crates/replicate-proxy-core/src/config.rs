//! Environment -> [`Settings`].
//!
//! Settings are a pure function of an environment lookup. The process reads
//! them fresh for every invocation; tests inject a synthetic environment
//! through [`from_lookup`] instead of mutating the real one.
//!
//! Unusable values fall back to their defaults. The problems are returned in
//! [`Resolved`] rather than logged on the spot, so the process can report them
//! once, after the logger is up, instead of on every invocation.

use std::collections::HashMap;

use replicate_proxy_types::models::settings::{
    DEFAULT_BACKEND_TIMEOUT_MS, DEFAULT_MAX_REQUEST_BYTES, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_REPLICATE_API_BASE, WILDCARD_ORIGIN,
};
use replicate_proxy_types::{ConfigError, LogLevel, Settings};

pub const ENV_MAX_REQUEST_SIZE: &str = "MAX_REQUEST_SIZE";
pub const ENV_TIMEOUT: &str = "REPLICATE_TIMEOUT";
pub const ENV_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_STACK_TRACES: &str = "ENABLE_STACK_TRACES";
pub const ENV_APP_ENV: &str = "APP_ENV";
pub const ENV_API_BASE: &str = "REPLICATE_API_BASE_URL";
pub const ENV_POLL_INTERVAL: &str = "REPLICATE_POLL_INTERVAL";

/// Settings plus every value that had to fall back to its default.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub settings: Settings,
    pub problems: Vec<ConfigError>,
}

impl Resolved {
    /// Log each fallback as a warning.
    pub fn report(&self) {
        for err in &self.problems {
            tracing::warn!(key = err.key(), "{}, using default", err);
        }
    }
}

/// Resolve settings from the process environment.
pub fn from_env() -> Settings {
    resolve_env().settings
}

/// Like [`from_env`], keeping the fallback problems.
pub fn resolve_env() -> Resolved {
    resolve_lookup(|key| std::env::var(key).ok())
}

/// Resolve settings from a fixed set of variables.
pub fn from_vars(vars: &HashMap<String, String>) -> Settings {
    from_lookup(|key| vars.get(key).cloned())
}

/// Resolve settings through an arbitrary lookup.
pub fn from_lookup<F>(lookup: F) -> Settings
where
    F: Fn(&str) -> Option<String>,
{
    resolve_lookup(lookup).settings
}

/// Resolve settings through an arbitrary lookup, keeping the fallback
/// problems. Missing variables take their defaults without a problem.
pub fn resolve_lookup<F>(lookup: F) -> Resolved
where
    F: Fn(&str) -> Option<String>,
{
    let mut problems = Vec::new();
    let production = lookup(ENV_APP_ENV)
        .is_some_and(|env| env.trim().eq_ignore_ascii_case("production"));

    let max_request_bytes = resolve(
        &lookup,
        &mut problems,
        ENV_MAX_REQUEST_SIZE,
        DEFAULT_MAX_REQUEST_BYTES,
        parse_positive,
    );
    let backend_timeout_ms =
        resolve(&lookup, &mut problems, ENV_TIMEOUT, DEFAULT_BACKEND_TIMEOUT_MS, parse_positive);
    let poll_interval_ms = resolve(
        &lookup,
        &mut problems,
        ENV_POLL_INTERVAL,
        DEFAULT_POLL_INTERVAL_MS,
        parse_positive,
    );

    let allowed_origins = lookup(ENV_ALLOWED_ORIGINS)
        .map(|raw| parse_origins(&raw))
        .unwrap_or_else(|| vec![WILDCARD_ORIGIN.to_string()]);

    let default_level = if production { LogLevel::Info } else { LogLevel::Debug };
    let log_level = resolve(&lookup, &mut problems, ENV_LOG_LEVEL, default_level, |key, raw| {
        LogLevel::parse(raw).ok_or_else(|| ConfigError::invalid(key, raw, "unknown log level"))
    });

    let disclose_stack_traces =
        resolve(&lookup, &mut problems, ENV_STACK_TRACES, !production, parse_bool);

    let replicate_api_base = resolve(
        &lookup,
        &mut problems,
        ENV_API_BASE,
        DEFAULT_REPLICATE_API_BASE.to_string(),
        parse_base_url,
    );

    let settings = Settings {
        max_request_bytes,
        backend_timeout_ms,
        allowed_origins,
        log_level,
        disclose_stack_traces,
        production,
        replicate_api_base,
        poll_interval_ms,
    };
    Resolved { settings, problems }
}

fn resolve<F, T, P>(
    lookup: &F,
    problems: &mut Vec<ConfigError>,
    key: &str,
    default: T,
    parse: P,
) -> T
where
    F: Fn(&str) -> Option<String>,
    P: Fn(&str, &str) -> Result<T, ConfigError>,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match parse(key, &raw) {
        Ok(value) => value,
        Err(err) => {
            problems.push(err);
            default
        },
    }
}

fn parse_positive(key: &str, raw: &str) -> Result<u64, ConfigError> {
    let value: u64 =
        raw.trim().parse().map_err(|e: std::num::ParseIntError| ConfigError::invalid(key, raw, e.to_string()))?;
    if value == 0 {
        return Err(ConfigError::out_of_range(key, raw));
    }
    Ok(value)
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(key, raw, "expected true or false")),
    }
}

fn parse_base_url(key: &str, raw: &str) -> Result<String, ConfigError> {
    let url = raw.trim().trim_end_matches('/');
    if url.is_empty() {
        return Err(ConfigError::invalid(key, raw, "empty URL"));
    }
    url::Url::parse(url).map_err(|e| ConfigError::invalid(key, raw, e.to_string()))?;
    Ok(url.to_string())
}

/// Split a comma-separated allow-list, keeping configured order.
/// An empty list means "allow any".
fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();

    if origins.is_empty() {
        vec![WILDCARD_ORIGIN.to_string()]
    } else {
        origins
    }
}
