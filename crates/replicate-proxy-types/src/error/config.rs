//! Configuration-related errors.

use thiserror::Error;

/// An environment value that could not be turned into a setting.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Value is present but does not parse as the expected type
    #[error("Invalid value for {key}: {value:?} ({message})")]
    InvalidValue {
        /// Environment variable name
        key: String,
        /// Raw value as found in the environment
        value: String,
        /// Why it was rejected
        message: String,
    },

    /// Value parsed but is outside the accepted range
    #[error("Value for {key} out of range: {value}")]
    OutOfRange {
        /// Environment variable name
        key: String,
        /// Raw value as found in the environment
        value: String,
    },
}

impl ConfigError {
    pub fn invalid(key: &str, value: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue { key: key.to_string(), value: value.to_string(), message: message.into() }
    }

    pub fn out_of_range(key: &str, value: &str) -> Self {
        Self::OutOfRange { key: key.to_string(), value: value.to_string() }
    }

    /// Name of the offending environment variable.
    pub fn key(&self) -> &str {
        match self {
            Self::InvalidValue { key, .. } | Self::OutOfRange { key, .. } => key,
        }
    }
}
