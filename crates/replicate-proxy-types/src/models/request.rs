//! Transport-independent request.

use super::{HeaderMap, QueryMap};

/// One inbound HTTP-like invocation, whatever trigger delivered it.
///
/// `headers` is always present (possibly empty). `body` and
/// `query_parameters` are `None` when the trigger carried nothing, which is
/// not the same as an empty string or an empty map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalRequest {
    pub method: String,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Option<String>,
    pub query_parameters: Option<QueryMap>,
}

impl CanonicalRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self { method: method.into(), path: path.into(), ..Self::default() }
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn with_query(mut self, query: QueryMap) -> Self {
        self.query_parameters = Some(query);
        self
    }

    /// Case-insensitive header lookup. Triggers disagree on header casing, so
    /// `Origin` and `origin` must resolve to the same value.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Body size in UTF-8 bytes, zero when absent.
    pub fn body_len(&self) -> usize {
        self.body.as_ref().map_or(0, String::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_ignores_case() {
        let req = CanonicalRequest::new("GET", "/").with_header("Origin", "https://app1.com");

        assert_eq!(req.header("origin"), Some("https://app1.com"));
        assert_eq!(req.header("ORIGIN"), Some("https://app1.com"));
        assert_eq!(req.header("referer"), None);
    }

    #[test]
    fn test_body_len_counts_utf8_bytes() {
        let req = CanonicalRequest::new("POST", "/").with_body("héllo");
        assert_eq!(req.body_len(), 6);
        assert_eq!(CanonicalRequest::new("POST", "/").body_len(), 0);
    }

    #[test]
    fn test_absent_body_is_not_empty_body() {
        let absent = CanonicalRequest::new("POST", "/");
        let empty = CanonicalRequest::new("POST", "/").with_body("");
        assert_ne!(absent, empty);
    }
}
