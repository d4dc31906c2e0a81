//! Validated body of `POST /api/replicate`.

use std::fmt;

use serde_json::{Map, Value};

/// A proxy request that passed validation.
///
/// Only the validator constructs this from untrusted input; the credential
/// never shows up in `Debug` output.
#[derive(Clone, PartialEq)]
pub struct ProxyRequestPayload {
    /// `owner/name`
    pub model: String,
    /// Model input; empty object when the caller sent none
    pub input: Map<String, Value>,
    /// Caller-supplied Replicate API token (`apiKey` in the body)
    pub credential: String,
}

impl ProxyRequestPayload {
    pub fn input_value(&self) -> Value {
        Value::Object(self.input.clone())
    }
}

impl fmt::Debug for ProxyRequestPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyRequestPayload")
            .field("model", &self.model)
            .field("input", &self.input)
            .field("credential", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_credential() {
        let payload = ProxyRequestPayload {
            model: "owner/model".to_string(),
            input: Map::new(),
            credential: "r8_supersecret".to_string(),
        };

        let printed = format!("{:?}", payload);
        assert!(printed.contains("owner/model"));
        assert!(!printed.contains("supersecret"));
    }
}
