//! Trigger payload normalization.
//!
//! An invocation arrives as raw JSON in one of three shapes. [`TriggerEvent::detect`]
//! runs ordered structural checks and tags the event; each tag has its own
//! normalizer, so nothing downstream ever branches on the trigger again.
//!
//! ```text
//! raw JSON ──detect──▶ TriggerEvent::{Gateway, Edge, Direct}
//!                              │ normalize
//!                              ▼
//!                      CanonicalRequest ──▶ dispatch ──▶ CanonicalResponse
//!                                                              │ TriggerKind::reply
//!                                                              ▼
//!                                                   trigger-specific reply JSON
//! ```

mod direct;
mod edge;
mod gateway;
mod reply;


use base64::Engine;
use serde_json::{Map, Value};

use replicate_proxy_types::{CanonicalRequest, HeaderMap, QueryMap};

/// Which shape an event was recognized as. Decides the reply shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    /// API-gateway style: `httpMethod`, `path`, `headers` at top level
    Gateway,
    /// CDN edge style: `Records[0].cf.request`
    Edge,
    /// Anything else, read leniently
    Direct,
}

/// A raw event tagged with its recognized shape.
#[derive(Debug, Clone, Copy)]
pub enum TriggerEvent<'a> {
    Gateway(&'a Map<String, Value>),
    /// Holds the `cf` record (request plus config)
    Edge(&'a Map<String, Value>),
    Direct(&'a Value),
}

/// Result of normalizing one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEvent {
    pub kind: TriggerKind,
    pub request: CanonicalRequest,
    /// Request id carried by the trigger, if any
    pub request_id: Option<String>,
}

impl<'a> TriggerEvent<'a> {
    /// Tag `event`. First structural match wins: gateway, then edge, then direct.
    pub fn detect(event: &'a Value) -> Self {
        if let Some(map) = event.as_object() {
            if gateway::matches(map) {
                return Self::Gateway(map);
            }
            if let Some(cf) = edge::cf_record(map) {
                return Self::Edge(cf);
            }
        }
        Self::Direct(event)
    }

    pub fn kind(&self) -> TriggerKind {
        match self {
            Self::Gateway(_) => TriggerKind::Gateway,
            Self::Edge(_) => TriggerKind::Edge,
            Self::Direct(_) => TriggerKind::Direct,
        }
    }

    pub fn normalize(&self) -> CanonicalRequest {
        match self {
            Self::Gateway(map) => gateway::normalize(map),
            Self::Edge(cf) => edge::normalize(cf),
            Self::Direct(event) => direct::normalize(event),
        }
    }

    /// Request id supplied by the trigger itself.
    pub fn request_id(&self) -> Option<String> {
        match self {
            Self::Gateway(map) => gateway::request_id(map),
            Self::Edge(cf) => edge::request_id(cf),
            Self::Direct(event) => direct::request_id(event),
        }
    }
}

/// Detect and normalize in one step.
pub fn normalize(event: &Value) -> NormalizedEvent {
    let tagged = TriggerEvent::detect(event);
    NormalizedEvent { kind: tagged.kind(), request: tagged.normalize(), request_id: tagged.request_id() }
}

/// Render a JSON scalar as a header/query value. `None` for null.
fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Object -> string map; anything that is not an object yields an empty map.
fn string_map(value: Option<&Value>) -> HeaderMap {
    value
        .and_then(Value::as_object)
        .map(|obj| {
            obj.iter()
                .filter_map(|(k, v)| value_to_string(v).map(|v| (k.clone(), v)))
                .collect()
        })
        .unwrap_or_default()
}

/// Object -> string map; null, absent or non-object yields `None`.
fn optional_string_map(value: Option<&Value>) -> Option<QueryMap> {
    value.filter(|v| v.is_object()).map(|v| string_map(Some(v)))
}

/// Body that is not already a string gets JSON-serialized; null stays absent.
fn body_to_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Base64 -> UTF-8 text. Undecodable input is treated as "no body".
fn decode_base64_body(data: &str) -> Option<String> {
    match base64::engine::general_purpose::STANDARD.decode(data.trim()) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            tracing::warn!("Discarding request body with invalid base64 encoding: {}", e);
            None
        },
    }
}

fn str_field<'v>(map: &'v Map<String, Value>, key: &str) -> Option<&'v str> {
    map.get(key).and_then(Value::as_str)
}
