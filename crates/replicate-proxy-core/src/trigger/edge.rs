//! CDN edge (CloudFront-style) events.
//!
//! ```json
//! {"Records": [{"cf": {
//!     "config":  {"requestId": "..."},
//!     "request": {
//!         "method": "POST",
//!         "uri": "/api/replicate",
//!         "querystring": "a=1&b=2",
//!         "headers": {"content-type": [{"key": "Content-Type", "value": "application/json"}]},
//!         "body": {"encoding": "base64", "data": "eyJtb2RlbCI6..."}
//!     }
//! }}]}
//! ```

use serde_json::{Map, Value};

use replicate_proxy_types::{CanonicalRequest, HeaderMap, QueryMap};

use super::{decode_base64_body, str_field};

/// The `cf` record, when `Records[0].cf.request` is an object.
pub(super) fn cf_record(map: &Map<String, Value>) -> Option<&Map<String, Value>> {
    let cf = map.get("Records")?.as_array()?.first()?.get("cf")?.as_object()?;
    cf.get("request").filter(|r| r.is_object()).map(|_| cf)
}

pub(super) fn normalize(cf: &Map<String, Value>) -> CanonicalRequest {
    let empty = Map::new();
    let request = cf.get("request").and_then(Value::as_object).unwrap_or(&empty);

    CanonicalRequest {
        method: str_field(request, "method").unwrap_or("GET").to_string(),
        path: str_field(request, "uri").unwrap_or("/").to_string(),
        headers: collapse_headers(request.get("headers")),
        body: decode_body(request.get("body")),
        query_parameters: str_field(request, "querystring").and_then(parse_query),
    }
}

pub(super) fn request_id(cf: &Map<String, Value>) -> Option<String> {
    cf.get("config")
        .and_then(|c| c.get("requestId"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// `{name: [{key, value}, ...]}` -> `{name: first value}`.
fn collapse_headers(value: Option<&Value>) -> HeaderMap {
    let Some(headers) = value.and_then(Value::as_object) else {
        return HeaderMap::new();
    };
    headers
        .iter()
        .filter_map(|(name, entries)| {
            let first = entries.as_array()?.first()?;
            let value = first.get("value")?.as_str()?;
            Some((name.clone(), value.to_string()))
        })
        .collect()
}

/// Empty `data` counts as no body: the CDN sends `""` when there is none.
fn decode_body(value: Option<&Value>) -> Option<String> {
    let body = value?.as_object()?;
    let data = str_field(body, "data").filter(|d| !d.is_empty())?;
    match str_field(body, "encoding") {
        Some("text") => Some(data.to_string()),
        _ => decode_base64_body(data),
    }
}

fn parse_query(raw: &str) -> Option<QueryMap> {
    let raw = raw.trim_start_matches('?');
    if raw.is_empty() {
        return None;
    }
    Some(url::form_urlencoded::parse(raw.as_bytes()).into_owned().collect())
}
