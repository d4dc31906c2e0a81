//! Direct invocations: whatever the caller sent, read leniently.

use serde_json::Value;

use replicate_proxy_types::CanonicalRequest;

use super::{body_to_string, optional_string_map, string_map};

pub(super) fn normalize(event: &Value) -> CanonicalRequest {
    let method = first_str(event, &["httpMethod", "method"]).unwrap_or("GET");
    let path = first_str(event, &["path", "uri"]).unwrap_or("/");
    let query = ["queryStringParameters", "query"]
        .iter()
        .find_map(|key| optional_string_map(event.get(*key)));

    CanonicalRequest {
        method: method.to_string(),
        path: path.to_string(),
        headers: string_map(event.get("headers")),
        body: body_to_string(event.get("body")),
        query_parameters: query,
    }
}

pub(super) fn request_id(event: &Value) -> Option<String> {
    event
        .get("requestId")
        .or_else(|| event.get("requestContext").and_then(|ctx| ctx.get("requestId")))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// First non-empty string among `keys`.
fn first_str<'v>(event: &'v Value, keys: &[&str]) -> Option<&'v str> {
    keys.iter()
        .find_map(|key| event.get(*key).and_then(Value::as_str).filter(|s| !s.is_empty()))
}
