//! Timeout-guarded call into the inference backend.

use async_trait::async_trait;
use serde_json::Value;
use std::time::{Duration, Instant};

use replicate_proxy_types::{BackendError, ProxyRequestPayload};

use crate::redact::mask_credential;

/// The inference API, seen from the proxy.
///
/// The credential is passed per call and must not be retained by the
/// implementation.
#[async_trait]
pub trait PredictionBackend: Send + Sync {
    async fn predict(
        &self,
        model: &str,
        input: &Value,
        credential: &str,
    ) -> Result<Value, BackendError>;
}

/// Run one prediction, bounded by `timeout_ms`.
///
/// On timeout the backend future is dropped, which also drops any in-flight
/// HTTP request it owns; its eventual result can never reach the caller.
pub async fn forward(
    backend: &dyn PredictionBackend,
    payload: &ProxyRequestPayload,
    timeout_ms: u64,
) -> Result<Value, BackendError> {
    let started = Instant::now();
    tracing::info!(
        model = %payload.model,
        credential = %mask_credential(&payload.credential),
        timeout_ms,
        "Forwarding prediction request"
    );

    let input = payload.input_value();
    let call = backend.predict(&payload.model, &input, &payload.credential);

    let result = match tokio::time::timeout(Duration::from_millis(timeout_ms), call).await {
        Ok(result) => result,
        Err(_) => Err(BackendError::timed_out(timeout_ms)),
    };

    let elapsed_ms = started.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => {
            tracing::info!(model = %payload.model, elapsed_ms, "Prediction succeeded");
        },
        Err(err) => {
            tracing::warn!(
                model = %payload.model,
                elapsed_ms,
                status = err.status_code(),
                "Prediction failed: {}",
                err
            );
        },
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Echo;

    #[async_trait]
    impl PredictionBackend for Echo {
        async fn predict(&self, _: &str, input: &Value, _: &str) -> Result<Value, BackendError> {
            Ok(input.clone())
        }
    }

    struct Slow {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PredictionBackend for Slow {
        async fn predict(&self, _: &str, _: &Value, _: &str) -> Result<Value, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(json!("too late"))
        }
    }

    fn payload(input: Value) -> ProxyRequestPayload {
        ProxyRequestPayload {
            model: "owner/model".to_string(),
            input: input.as_object().cloned().unwrap_or_else(Map::new),
            credential: "r8_test_credential".to_string(),
        }
    }

    #[tokio::test]
    async fn test_success_passes_result_through() {
        let input = json!({"prompt": "a cat", "nested": {"steps": [1, 2, 3]}});
        let result = forward(&Echo, &payload(input.clone()), 1_000).await;
        assert_eq!(result, Ok(input));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_surfaces_error_once() {
        let backend = Slow { calls: AtomicUsize::new(0) };

        let err = forward(&backend, &payload(json!({})), 250).await.unwrap_err();

        assert_eq!(err.message, "Backend call timed out after 250ms");
        assert_eq!(err.status_code(), 500);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }
}
