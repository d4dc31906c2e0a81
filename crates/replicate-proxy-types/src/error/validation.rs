//! Request body validation failures.

use thiserror::Error;

/// First rule a proxy request body failed. Validation short-circuits, so there
/// is never more than one.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Body is not a JSON object (array, primitive or null)
    #[error("Request body must be a valid object")]
    NotAnObject,

    /// `model` missing, not a string, too long or not `owner/name`
    #[error("Model name is required and must be in format owner/model")]
    InvalidModel,

    /// `apiKey` missing, not a string, wrong length or padded with whitespace
    #[error("Valid API key is required (8-200 characters)")]
    InvalidCredential,

    /// `input` present but not a JSON object
    #[error("Input must be an object")]
    InvalidInput,
}
