//! Proxy pipeline errors.

use thiserror::Error;

use super::{BackendError, ValidationError};

/// Every way a single invocation can end in an error response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProxyError {
    /// Body exceeds the configured byte limit (checked before parsing)
    #[error("Request body too large: {size} bytes exceeds the limit of {limit} bytes")]
    PayloadTooLarge { size: usize, limit: u64 },

    /// Body is not parseable JSON
    #[error("Invalid JSON in request body")]
    InvalidJson { message: String },

    /// Body parsed but failed field validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No route for this method and path
    #[error("Route {method}:{path} not found")]
    RouteNotFound { method: String, path: String },

    /// Backend call failed or timed out
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl ProxyError {
    /// Get HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::PayloadTooLarge { .. } | Self::InvalidJson { .. } | Self::Validation(_) => 400,
            Self::RouteNotFound { .. } => 404,
            Self::Backend(err) => err.status_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_codes() {
        assert_eq!(ProxyError::PayloadTooLarge { size: 10, limit: 1 }.http_status_code(), 400);
        assert_eq!(
            ProxyError::InvalidJson { message: "eof".to_string() }.http_status_code(),
            400
        );
        assert_eq!(
            ProxyError::RouteNotFound { method: "GET".to_string(), path: "/x".to_string() }
                .http_status_code(),
            404
        );
    }

    #[test]
    fn test_backend_status_passes_through() {
        let err = ProxyError::from(BackendError::new("Model not found").with_status(404));
        assert_eq!(err.http_status_code(), 404);

        let err = ProxyError::from(BackendError::new("boom"));
        assert_eq!(err.http_status_code(), 500);
    }

    #[test]
    fn test_route_not_found_message() {
        let err = ProxyError::RouteNotFound { method: "GET".to_string(), path: "/unknown".to_string() };
        assert_eq!(err.to_string(), "Route GET:/unknown not found");
    }
}
