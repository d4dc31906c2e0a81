//! The one place responses are made.
//!
//! Every outcome, success or error, goes through [`ResponseBuilder::build`],
//! which always attaches the CORS and content-type headers.

use serde_json::{json, Value};

use replicate_proxy_types::{CanonicalRequest, CanonicalResponse, HeaderMap, ProxyError, Settings};

use crate::cors::{
    resolve_allow_origin, ALLOWED_HEADERS, ALLOWED_METHODS, ALLOW_HEADERS, ALLOW_METHODS,
    ALLOW_ORIGIN, CONTENT_TYPE, JSON_CONTENT_TYPE,
};

/// Response payload before serialization.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Sent verbatim (only the empty preflight body uses this)
    Raw(String),
    /// Serialized as JSON
    Json(Value),
}

impl From<Value> for ResponseBody {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl ResponseBody {
    fn into_string(self) -> String {
        match self {
            Self::Raw(text) => text,
            Self::Json(value) => {
                serde_json::to_string(&value).unwrap_or_else(|_| "{}".to_string())
            },
        }
    }
}

/// Builds responses for one request. Holds the negotiated allow-origin.
#[derive(Debug, Clone)]
pub struct ResponseBuilder {
    allow_origin: String,
    disclose_stack_traces: bool,
}

impl ResponseBuilder {
    pub fn new(settings: &Settings, request: &CanonicalRequest) -> Self {
        Self::for_origin(settings, request.header("origin"))
    }

    pub fn for_origin(settings: &Settings, origin: Option<&str>) -> Self {
        Self {
            allow_origin: resolve_allow_origin(settings, origin),
            disclose_stack_traces: settings.disclose_stack_traces,
        }
    }

    pub fn build(&self, status_code: u16, body: impl Into<ResponseBody>) -> CanonicalResponse {
        CanonicalResponse {
            status_code,
            headers: self.headers(),
            body: body.into().into_string(),
        }
    }

    pub fn json(&self, status_code: u16, body: Value) -> CanonicalResponse {
        self.build(status_code, ResponseBody::Json(body))
    }

    /// 200 with an empty body (CORS preflight).
    pub fn empty(&self) -> CanonicalResponse {
        self.build(200, ResponseBody::Raw(String::new()))
    }

    /// Error response; body shape depends on the error class.
    pub fn error(&self, err: &ProxyError) -> CanonicalResponse {
        let status = err.http_status_code();
        let body = match err {
            ProxyError::PayloadTooLarge { .. } => json!({
                "error": "Request body too large",
                "details": err.to_string(),
            }),
            ProxyError::InvalidJson { .. } => json!({ "error": err.to_string() }),
            ProxyError::Validation(validation) => json!({ "error": validation.to_string() }),
            ProxyError::RouteNotFound { .. } => json!({
                "message": err.to_string(),
                "error": "Not Found",
                "statusCode": status,
            }),
            ProxyError::Backend(backend) => json!({
                "error": backend.message,
                "details": backend.detail_or_message(),
            }),
        };
        self.json(status, body)
    }

    /// 500 with `{error, details, stack?}`. `stack` only when disclosure is on.
    pub fn internal_error(&self, details: &str, stack: Option<&str>) -> CanonicalResponse {
        let mut body = json!({
            "error": "Internal server error",
            "details": details,
        });
        if self.disclose_stack_traces {
            if let (Some(stack), Some(obj)) = (stack, body.as_object_mut()) {
                obj.insert("stack".to_string(), Value::String(stack.to_string()));
            }
        }
        self.json(500, body)
    }

    fn headers(&self) -> HeaderMap {
        HeaderMap::from([
            (ALLOW_ORIGIN.to_string(), self.allow_origin.clone()),
            (ALLOW_METHODS.to_string(), ALLOWED_METHODS.to_string()),
            (ALLOW_HEADERS.to_string(), ALLOWED_HEADERS.to_string()),
            (CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use replicate_proxy_types::{BackendError, ValidationError};

    fn builder() -> ResponseBuilder {
        ResponseBuilder::for_origin(&Settings::default(), None)
    }

    fn assert_fixed_headers(response: &CanonicalResponse) {
        assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));
        assert_eq!(response.header("Access-Control-Allow-Methods"), Some("GET, POST, OPTIONS"));
        assert_eq!(
            response.header("Access-Control-Allow-Headers"),
            Some("Content-Type, Authorization")
        );
        assert_eq!(response.header("Content-Type"), Some("application/json"));
    }

    #[test]
    fn test_every_constructor_sets_fixed_headers() {
        let b = builder();
        assert_fixed_headers(&b.json(200, json!({"ok": true})));
        assert_fixed_headers(&b.empty());
        assert_fixed_headers(&b.error(&ProxyError::InvalidJson { message: "x".into() }));
        assert_fixed_headers(&b.internal_error("x", Some("trace")));
    }

    #[test]
    fn test_raw_body_is_verbatim() {
        let response = builder().empty();
        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, "");
    }

    #[test]
    fn test_json_string_body_is_quoted() {
        let response = builder().json(200, json!("done"));
        assert_eq!(response.body, "\"done\"");
    }

    #[test]
    fn test_invalid_json_body_shape() {
        let response = builder().error(&ProxyError::InvalidJson { message: "eof".to_string() });
        assert_eq!(response.status_code, 400);
        assert_eq!(response.json_body().unwrap(), json!({"error": "Invalid JSON in request body"}));
    }

    #[test]
    fn test_validation_body_shape() {
        let response = builder().error(&ValidationError::InvalidModel.into());
        assert_eq!(response.status_code, 400);
        assert_eq!(
            response.json_body().unwrap(),
            json!({"error": "Model name is required and must be in format owner/model"})
        );
    }

    #[test]
    fn test_not_found_body_shape() {
        let err = ProxyError::RouteNotFound { method: "GET".to_string(), path: "/nope".to_string() };
        let response = builder().error(&err);
        assert_eq!(response.status_code, 404);
        assert_eq!(
            response.json_body().unwrap(),
            json!({"message": "Route GET:/nope not found", "error": "Not Found", "statusCode": 404})
        );
    }

    #[test]
    fn test_backend_body_shape() {
        let err = BackendError::new("Model not found").with_status(404).with_detail("no such model");
        let response = builder().error(&err.into());
        assert_eq!(response.status_code, 404);
        assert_eq!(
            response.json_body().unwrap(),
            json!({"error": "Model not found", "details": "no such model"})
        );
    }

    #[test]
    fn test_stack_only_when_enabled() {
        let shown = builder().internal_error("boom", Some("caused by: io"));
        assert_eq!(shown.json_body().unwrap()["stack"], "caused by: io");

        let settings = Settings { disclose_stack_traces: false, ..Settings::default() };
        let hidden = ResponseBuilder::for_origin(&settings, None).internal_error("boom", Some("x"));
        let body = hidden.json_body().unwrap();
        assert!(body.get("stack").is_none());
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["details"], "boom");
    }
}
