//! Unified error types for Replicate Proxy Core.

use thiserror::Error;

/// Failures outside the expected request taxonomy. Each of these ends up as a
/// 500 "Internal server error" response.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    /// HTTP client could not be built.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Invocation payload is not JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A handler panicked; carries the panic message.
    #[error("Handler panicked: {0}")]
    Panic(String),
}

/// Result type alias for core operations.
pub type AppResult<T> = Result<T, AppError>;

/// Render an error and its `source()` chain, one cause per line.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut lines = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        lines.push(format!("caused by: {}", cause));
        source = cause.source();
    }
    lines.join("\n")
}
