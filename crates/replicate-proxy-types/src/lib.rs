//! # Replicate Proxy Types
//!
//! Data model and error definitions shared by the Replicate proxy crates.
//!
//! - **`error`** - Typed errors for the proxy pipeline, the backend and configuration
//! - **`models`** - Canonical request/response, validated payload and settings
//!
//! ## Architecture Role
//!
//! ```text
//!            replicate-proxy-types (this crate)
//!                        │
//!                        ▼
//!              replicate-proxy-core
//!                        │
//!                        ▼
//!             replicate-proxy-server
//! ```
//!
//! Nothing in here performs I/O. Every type is plain data that can be built in
//! a test without a runtime.

pub mod error;
pub mod models;

pub use error::{BackendError, ConfigError, ProxyError, ValidationError};

pub use models::{
    CanonicalRequest, CanonicalResponse, HeaderMap, LogLevel, ProxyRequestPayload, QueryMap,
    Settings,
};
