//! API-gateway style events.

use serde_json::{Map, Value};

use replicate_proxy_types::CanonicalRequest;

use super::{body_to_string, decode_base64_body, optional_string_map, str_field, string_map};

/// `httpMethod` and `path` strings plus a `headers` key (mapping or null).
pub(super) fn matches(map: &Map<String, Value>) -> bool {
    str_field(map, "httpMethod").is_some()
        && str_field(map, "path").is_some()
        && map.get("headers").is_some_and(|h| h.is_object() || h.is_null())
}

pub(super) fn normalize(map: &Map<String, Value>) -> CanonicalRequest {
    let base64_encoded = map.get("isBase64Encoded").and_then(Value::as_bool).unwrap_or(false);

    let body = match map.get("body") {
        Some(Value::String(data)) if base64_encoded => decode_base64_body(data),
        other => body_to_string(other),
    };

    CanonicalRequest {
        method: str_field(map, "httpMethod").unwrap_or("GET").to_string(),
        path: str_field(map, "path").unwrap_or("/").to_string(),
        headers: string_map(map.get("headers")),
        body,
        query_parameters: optional_string_map(map.get("queryStringParameters")),
    }
}

pub(super) fn request_id(map: &Map<String, Value>) -> Option<String> {
    map.get("requestContext")
        .and_then(|ctx| ctx.get("requestId"))
        .and_then(Value::as_str)
        .map(str::to_string)
}
