//! CanonicalResponse -> trigger-specific reply JSON.

use reqwest::StatusCode;
use serde_json::{json, Map, Value};

use replicate_proxy_types::CanonicalResponse;

use super::TriggerKind;

impl TriggerKind {
    /// Shape `response` the way this trigger expects its reply.
    pub fn reply(self, response: &CanonicalResponse) -> Value {
        match self {
            Self::Gateway | Self::Direct => json!(response),
            Self::Edge => edge_reply(response),
        }
    }
}

/// Edge replies carry the status as a string and headers as
/// `{lowercase-name: [{key, value}]}`.
fn edge_reply(response: &CanonicalResponse) -> Value {
    let description = StatusCode::from_u16(response.status_code)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("");

    let headers: Map<String, Value> = response
        .headers
        .iter()
        .map(|(key, value)| (key.to_ascii_lowercase(), json!([{ "key": key, "value": value }])))
        .collect();

    json!({
        "status": response.status_code.to_string(),
        "statusDescription": description,
        "headers": headers,
        "bodyEncoding": "text",
        "body": response.body,
    })
}
