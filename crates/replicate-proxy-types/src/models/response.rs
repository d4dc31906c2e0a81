//! Transport-independent response.

use serde::Serialize;

use super::HeaderMap;

/// Outcome of one invocation before it is adapted back to a trigger reply.
///
/// `body` is always a string: JSON text, or `""` for no-content replies.
/// Serializes as the gateway reply `{statusCode, headers, body}`.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalResponse {
    pub status_code: u16,
    pub headers: HeaderMap,
    pub body: String,
}

impl CanonicalResponse {
    /// Exact-name header lookup (the builder controls the casing).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Parse the body back into JSON.
    pub fn json_body(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.body)
    }
}
