//! Invocation entry points: trigger event in, trigger reply out.

use futures::FutureExt;
use serde_json::Value;
use std::any::Any;
use std::panic::AssertUnwindSafe;

use replicate_proxy_types::{CanonicalRequest, CanonicalResponse, Settings};

use super::{dispatch, InvocationContext};
use crate::error::{error_chain, AppError};
use crate::forward::PredictionBackend;
use crate::response::ResponseBuilder;
use crate::trigger::{self, TriggerKind};

/// [`dispatch`] with a catch-all: a panic anywhere below still yields a
/// 500 response carrying the CORS headers.
pub async fn handle_request(
    request: &CanonicalRequest,
    ctx: &InvocationContext,
    settings: &Settings,
    backend: &dyn PredictionBackend,
) -> CanonicalResponse {
    match AssertUnwindSafe(dispatch(request, ctx, settings, backend)).catch_unwind().await {
        Ok(response) => response,
        Err(panic) => {
            let err = AppError::Panic(panic_message(panic.as_ref()));
            internal_failure(&ResponseBuilder::new(settings, request), &ctx.request_id, &err)
        },
    }
}

/// Normalize a parsed event, handle it and shape the reply for its trigger.
pub async fn handle_event(
    event: &Value,
    settings: &Settings,
    backend: &dyn PredictionBackend,
) -> Value {
    let normalized = trigger::normalize(event);
    let ctx = InvocationContext::resolve(normalized.request_id, &normalized.request);
    let response = handle_request(&normalized.request, &ctx, settings, backend).await;
    normalized.kind.reply(&response)
}

/// Like [`handle_event`] but starting from raw text. Unparseable input gets a
/// direct-shaped 500 reply.
pub async fn handle_raw_event(
    raw: &str,
    settings: &Settings,
    backend: &dyn PredictionBackend,
) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(event) => handle_event(&event, settings, backend).await,
        Err(e) => {
            let err = AppError::from(e);
            let request_id = uuid::Uuid::new_v4().to_string();
            let response =
                internal_failure(&ResponseBuilder::for_origin(settings, None), &request_id, &err);
            TriggerKind::Direct.reply(&response)
        },
    }
}

fn internal_failure(
    responses: &ResponseBuilder,
    request_id: &str,
    err: &AppError,
) -> CanonicalResponse {
    tracing::error!(request_id = %request_id, "Unhandled error: {}", err);
    responses.internal_error(&err.to_string(), Some(&error_chain(err)))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
