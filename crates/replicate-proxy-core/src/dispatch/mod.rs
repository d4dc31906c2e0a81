//! Route table and the proxy flow.
//!
//! | path             | method  | behavior                  |
//! |------------------|---------|---------------------------|
//! | `/health`        | GET     | health payload            |
//! | `/api/replicate` | OPTIONS | CORS preflight            |
//! | `/api/replicate` | GET     | usage instructions        |
//! | `/api/replicate` | POST    | validate and forward      |
//! | anything else    |         | 404                       |

mod pipeline;


use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use replicate_proxy_types::{CanonicalRequest, CanonicalResponse, ProxyError, Settings};

use crate::forward::{forward, PredictionBackend};
use crate::response::ResponseBuilder;
use crate::validation::validate_payload;

pub use pipeline::{handle_event, handle_raw_event, handle_request};

pub const HEALTH_PATH: &str = "/health";
pub const PROXY_PATH: &str = "/api/replicate";

/// Per-invocation context that is not part of the request itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    pub request_id: String,
}

impl InvocationContext {
    /// Use the trigger's id, then an `x-request-id` header, then a fresh UUID.
    pub fn resolve(trigger_request_id: Option<String>, request: &CanonicalRequest) -> Self {
        let request_id = trigger_request_id
            .filter(|id| !id.is_empty())
            .or_else(|| request.header("x-request-id").map(str::to_string))
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        Self { request_id }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Health,
    Preflight,
    Usage,
    Proxy,
    NotFound,
}

/// Exact (method, path) match, first rule wins.
pub fn route(method: &str, path: &str) -> Route {
    match (path, method) {
        (HEALTH_PATH, "GET") => Route::Health,
        (PROXY_PATH, "OPTIONS") => Route::Preflight,
        (PROXY_PATH, "GET") => Route::Usage,
        (PROXY_PATH, "POST") => Route::Proxy,
        _ => Route::NotFound,
    }
}

/// Route one request and build its response. Expected failures become error
/// responses here; nothing is returned as `Err`.
pub async fn dispatch(
    request: &CanonicalRequest,
    ctx: &InvocationContext,
    settings: &Settings,
    backend: &dyn PredictionBackend,
) -> CanonicalResponse {
    let responses = ResponseBuilder::new(settings, request);
    let matched = route(&request.method, &request.path);
    tracing::info!(
        request_id = %ctx.request_id,
        method = %request.method,
        path = %request.path,
        route = ?matched,
        "Incoming request"
    );

    match matched {
        Route::Health => responses.json(200, health_body(ctx)),
        Route::Preflight => responses.empty(),
        Route::Usage => responses.json(200, usage_body()),
        Route::Proxy => match proxy(request, settings, backend).await {
            Ok(output) => responses.json(200, output),
            Err(err) => {
                tracing::warn!(request_id = %ctx.request_id, "Proxy request rejected: {}", err);
                responses.error(&err)
            },
        },
        Route::NotFound => responses.error(&ProxyError::RouteNotFound {
            method: request.method.clone(),
            path: request.path.clone(),
        }),
    }
}

/// size check -> JSON parse -> validation -> backend call, strictly in order.
async fn proxy(
    request: &CanonicalRequest,
    settings: &Settings,
    backend: &dyn PredictionBackend,
) -> Result<Value, ProxyError> {
    check_size(request, settings.max_request_bytes)?;
    let body = parse_body(request)?;
    let payload = validate_payload(&body)?;
    let output = forward(backend, &payload, settings.backend_timeout_ms).await?;
    Ok(output)
}

fn check_size(request: &CanonicalRequest, limit: u64) -> Result<(), ProxyError> {
    let size = request.body_len();
    if size as u64 > limit {
        return Err(ProxyError::PayloadTooLarge { size, limit });
    }
    Ok(())
}

/// Absent or empty body parses as `null` so validation reports it.
fn parse_body(request: &CanonicalRequest) -> Result<Value, ProxyError> {
    match request.body.as_deref() {
        None | Some("") => Ok(Value::Null),
        Some(text) => serde_json::from_str(text)
            .map_err(|e| ProxyError::InvalidJson { message: e.to_string() }),
    }
}

fn health_body(ctx: &InvocationContext) -> Value {
    json!({
        "status": "ok",
        "message": "Replicate proxy server is running",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "requestId": ctx.request_id,
    })
}

fn usage_body() -> Value {
    json!({
        "message": "Replicate API Proxy",
        "instructions": {
            "method": "POST",
            "endpoint": PROXY_PATH,
            "body": {
                "model": "owner/model-name",
                "input": { "prompt": "Your prompt here" },
                "apiKey": "your-replicate-api-token",
            },
        },
    })
}
