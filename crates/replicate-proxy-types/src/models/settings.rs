//! Process settings resolved from the environment.

use std::fmt;

pub const DEFAULT_MAX_REQUEST_BYTES: u64 = 1_048_576;
pub const DEFAULT_BACKEND_TIMEOUT_MS: u64 = 300_000;
pub const DEFAULT_REPLICATE_API_BASE: &str = "https://api.replicate.com/v1";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;
pub const WILDCARD_ORIGIN: &str = "*";

/// Log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

impl LogLevel {
    /// Parse from string, case-insensitive. `warning` is accepted for `warn`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warn" | "warning" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "debug" => Some(Self::Debug),
            "trace" => Some(Self::Trace),
            _ => None,
        }
    }
}

/// Immutable settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Largest accepted request body, in bytes
    pub max_request_bytes: u64,
    /// Upper bound on one backend call, in milliseconds
    pub backend_timeout_ms: u64,
    /// CORS allow-list, in configured order
    pub allowed_origins: Vec<String>,
    /// Log verbosity
    pub log_level: LogLevel,
    /// Attach error chains to 500 bodies
    pub disclose_stack_traces: bool,
    /// Production mode (flips the defaults of the two fields above)
    pub production: bool,
    /// Base URL of the Replicate HTTP API
    pub replicate_api_base: String,
    /// Delay between prediction status polls, in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
            backend_timeout_ms: DEFAULT_BACKEND_TIMEOUT_MS,
            allowed_origins: vec![WILDCARD_ORIGIN.to_string()],
            log_level: LogLevel::Debug,
            disclose_stack_traces: true,
            production: false,
            replicate_api_base: DEFAULT_REPLICATE_API_BASE.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl Settings {
    /// True when the allow-list contains `*`.
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == WILDCARD_ORIGIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parse() {
        assert_eq!(LogLevel::parse("DEBUG"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse(" warning "), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("verbose"), None);
        assert_eq!(LogLevel::Trace.to_string(), "trace");
    }

    #[test]
    fn test_default_allows_any_origin() {
        let settings = Settings::default();
        assert!(settings.allows_any_origin());
        assert_eq!(settings.max_request_bytes, 1_048_576);
        assert_eq!(settings.backend_timeout_ms, 300_000);
    }
}
