//! Backend (inference API) failures.

use thiserror::Error;

const DEFAULT_BACKEND_STATUS: u16 = 500;

/// Failure reported by the inference backend.
///
/// `status` and `detail` are optional on purpose: a backend that only knows
/// "something went wrong" still produces a usable response (500, detail equal
/// to the message).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct BackendError {
    /// Primary human-readable error string
    pub message: String,
    /// HTTP status suggested by the backend
    pub status: Option<u16>,
    /// Longer explanation, if the backend supplied one
    pub detail: Option<String>,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), status: None, detail: None }
    }

    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Timeout raised by the forwarder when the backend does not settle in time.
    pub fn timed_out(timeout_ms: u64) -> Self {
        Self::new(format!("Backend call timed out after {}ms", timeout_ms))
    }

    /// Status to respond with; 500 when the backend did not say.
    pub fn status_code(&self) -> u16 {
        self.status.unwrap_or(DEFAULT_BACKEND_STATUS)
    }

    /// Detail to respond with; falls back to the message.
    pub fn detail_or_message(&self) -> &str {
        self.detail.as_deref().unwrap_or(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_defaults_to_500() {
        let err = BackendError::new("boom");
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_detail_defaults_to_message() {
        let err = BackendError::new("boom");
        assert_eq!(err.detail_or_message(), "boom");

        let err = err.with_detail("upstream exploded");
        assert_eq!(err.detail_or_message(), "upstream exploded");
    }

    #[test]
    fn test_timed_out_message() {
        let err = BackendError::timed_out(250);
        assert_eq!(err.message, "Backend call timed out after 250ms");
        assert_eq!(err.status_code(), 500);
    }
}
