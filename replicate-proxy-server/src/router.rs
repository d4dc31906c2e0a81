//! HTTP adapter: axum request -> CanonicalRequest -> dispatcher -> axum response.
//!
//! There are no axum routes. Every method and path goes to one fallback
//! handler so the route table stays in the dispatcher.

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use tower_http::trace::TraceLayer;

use replicate_proxy_core::{handle_request, InvocationContext};
use replicate_proxy_types::{CanonicalRequest, CanonicalResponse, QueryMap};

use crate::state::AppState;

/// Transport cap, kept well above any sensible `MAX_REQUEST_SIZE` so the
/// dispatcher reports oversize bodies itself (400 "Request body too large").
const TRANSPORT_BODY_LIMIT: usize = 100 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .fallback(handle_any)
        .with_state(state)
        .layer(DefaultBodyLimit::max(TRANSPORT_BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
}

async fn handle_any(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = to_canonical(&method, &uri, &headers, &body);
    let ctx = InvocationContext::resolve(None, &request);
    let settings = state.settings();

    let response = handle_request(&request, &ctx, &settings, state.backend()).await;
    into_axum(response)
}

fn to_canonical(method: &Method, uri: &Uri, headers: &HeaderMap, body: &Bytes) -> CanonicalRequest {
    let mut request = CanonicalRequest::new(method.as_str(), uri.path());

    for (name, value) in headers {
        let Ok(value) = value.to_str() else {
            continue;
        };
        request
            .headers
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }

    if !body.is_empty() {
        request.body = Some(String::from_utf8_lossy(body).into_owned());
    }

    request.query_parameters = uri.query().filter(|q| !q.is_empty()).map(|q| {
        url::form_urlencoded::parse(q.as_bytes())
            .into_owned()
            .collect::<QueryMap>()
    });

    request
}

fn into_axum(response: CanonicalResponse) -> Response {
    let status = StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut headers = HeaderMap::new();
    for (name, value) in &response.headers {
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            },
            _ => tracing::warn!("Dropping response header that is not valid HTTP: {}", name),
        }
    }

    (status, headers, response.body).into_response()
}
