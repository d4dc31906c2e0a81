//! Typed error definitions for the Replicate proxy.
//!
//! - [`ProxyError`] is the pipeline taxonomy; every variant maps to one HTTP status.
//! - [`BackendError`] is what the inference backend hands back on failure.
//! - [`ValidationError`] is the single message produced by body validation.
//! - [`ConfigError`] describes an environment value that could not be used.

mod backend;
mod config;
mod proxy;
mod validation;

pub use backend::BackendError;
pub use config::ConfigError;
pub use proxy::ProxyError;
pub use validation::ValidationError;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProxyError::PayloadTooLarge { size: 2048, limit: 1024 };

        let msg = format!("{}", err);
        assert!(msg.contains("too large"));
        assert!(msg.contains("2048"));
        assert!(msg.contains("1024"));
    }

    #[test]
    fn test_validation_error_wraps_into_proxy_error() {
        let err: ProxyError = ValidationError::InvalidModel.into();
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.to_string(), ValidationError::InvalidModel.to_string());
    }

    #[test]
    fn test_backend_error_defaults() {
        let err = BackendError::new("boom");
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.detail_or_message(), "boom");

        let err = err.with_status(404).with_detail("no such model");
        assert_eq!(ProxyError::from(err).http_status_code(), 404);
    }
}
