//! # Replicate Proxy Core
//!
//! Everything between "an invocation arrived" and "here is the reply".
//!
//! ```text
//! replicate-proxy-core/src/
//! ├── trigger/     # gateway / edge / direct event shapes, in and out
//! ├── dispatch/    # route table, proxy flow, panic catch-all
//! ├── validation.rs
//! ├── response.rs  # the only place responses are built (CORS lives here)
//! ├── cors.rs
//! ├── forward.rs   # PredictionBackend + timeout
//! ├── upstream/    # Replicate HTTP client
//! ├── config.rs    # environment -> Settings
//! └── logger.rs
//! ```

#![allow(
    clippy::module_name_repetitions,
    reason = "ReplicateClient, ProxyRequestPayload read better fully qualified"
)]
// Test-only lints: allow panic!, unwrap etc. in test code
#![cfg_attr(
    test,
    allow(clippy::panic, clippy::unwrap_used, clippy::expect_used, clippy::assertions_on_result_states)
)]

pub mod config;
pub mod cors;
pub mod dispatch;
pub mod error;
pub mod forward;
pub mod logger;
pub mod redact;
pub mod response;
pub mod trigger;
pub mod upstream;
pub mod validation;

// Re-export commonly used types
pub use dispatch::{dispatch, handle_event, handle_raw_event, handle_request, InvocationContext};
pub use error::{AppError, AppResult};
pub use forward::{forward, PredictionBackend};
pub use response::ResponseBuilder;
pub use trigger::{NormalizedEvent, TriggerKind};
pub use upstream::ReplicateClient;
