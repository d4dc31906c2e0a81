// CORS origin negotiation
use replicate_proxy_types::models::settings::WILDCARD_ORIGIN;
use replicate_proxy_types::Settings;

pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
pub const ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
pub const CONTENT_TYPE: &str = "Content-Type";

pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type, Authorization";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Value for `Access-Control-Allow-Origin`.
///
/// - allow-list contains `*`: `*`
/// - request origin is on the list: that origin
/// - otherwise (unknown or missing origin): the first configured origin
///
/// The last case is a permissive fallback, not a rejection.
pub fn resolve_allow_origin(settings: &Settings, request_origin: Option<&str>) -> String {
    if settings.allows_any_origin() {
        return WILDCARD_ORIGIN.to_string();
    }

    if let Some(origin) = request_origin {
        if settings.allowed_origins.iter().any(|allowed| allowed == origin) {
            return origin.to_string();
        }
        tracing::debug!("Origin {} not in allow-list, falling back to first allowed origin", origin);
    }

    settings
        .allowed_origins
        .first()
        .cloned()
        .unwrap_or_else(|| WILDCARD_ORIGIN.to_string())
}
