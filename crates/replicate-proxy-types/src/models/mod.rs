//! Domain models.

pub mod payload;
pub mod request;
pub mod response;
pub mod settings;

use std::collections::BTreeMap;

/// Header name to value. Ordered so serialized responses are stable.
pub type HeaderMap = BTreeMap<String, String>;

/// Flat query string parameters.
pub type QueryMap = BTreeMap<String, String>;

pub use payload::ProxyRequestPayload;
pub use request::CanonicalRequest;
pub use response::CanonicalResponse;
pub use settings::{LogLevel, Settings};
