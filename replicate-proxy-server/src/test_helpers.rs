//! Test helpers for replicate-proxy-server unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use replicate_proxy_core::PredictionBackend;
use replicate_proxy_types::{BackendError, Settings};

use crate::state::AppState;

/// Backend that answers `{model, input}` without leaving the process.
pub struct EchoBackend;

#[async_trait]
impl PredictionBackend for EchoBackend {
    async fn predict(&self, model: &str, input: &Value, _: &str) -> Result<Value, BackendError> {
        Ok(json!({ "model": model, "input": input }))
    }
}

/// `AppState` over [`EchoBackend`] with pinned settings.
pub fn test_app_state(settings: Settings) -> AppState {
    AppState::with_settings(Arc::new(EchoBackend), settings)
}
