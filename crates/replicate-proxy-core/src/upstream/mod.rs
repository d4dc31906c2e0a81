//! Replicate HTTP client.
//!
//! Creates a prediction with `Prefer: wait` so short models answer in one
//! round trip, then polls the prediction's `get` URL until it reaches a
//! terminal status. The caller bounds the whole exchange with a timeout.

mod prediction;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;

use replicate_proxy_types::{BackendError, Settings};

use crate::error::AppResult;
use crate::forward::PredictionBackend;

pub use prediction::{ApiProblem, Prediction, PredictionStatus};

const UPSTREAM_UNREACHABLE_STATUS: u16 = 502;

pub struct ReplicateClient {
    http_client: Client,
    base_url: String,
    poll_interval: Duration,
}

impl ReplicateClient {
    /// Create a client with its own connection pool.
    pub fn new(base_url: &str, poll_interval_ms: u64) -> AppResult<Self> {
        let http_client = Client::builder().tcp_nodelay(true).build()?;
        Ok(Self::with_client(http_client, base_url, poll_interval_ms))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http_client: Client, base_url: &str, poll_interval_ms: u64) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            poll_interval: Duration::from_millis(poll_interval_ms),
        }
    }

    pub fn from_settings(settings: &Settings) -> AppResult<Self> {
        Self::new(&settings.replicate_api_base, settings.poll_interval_ms)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn create_prediction(
        &self,
        model: &str,
        input: &Value,
        credential: &str,
    ) -> Result<Prediction, BackendError> {
        let url = format!("{}/models/{}/predictions", self.base_url, model);
        tracing::debug!("Creating prediction at {}", url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(credential)
            .header("Prefer", "wait")
            .json(&json!({ "input": input }))
            .send()
            .await
            .map_err(transport_error)?;

        read_prediction(response).await
    }

    async fn fetch_prediction(&self, url: &str, credential: &str) -> Result<Prediction, BackendError> {
        let response = self
            .http_client
            .get(url)
            .bearer_auth(credential)
            .send()
            .await
            .map_err(transport_error)?;

        read_prediction(response).await
    }

    fn poll_url(&self, prediction: &Prediction) -> Option<String> {
        prediction
            .get_url()
            .map(str::to_string)
            .or_else(|| prediction.id.as_ref().map(|id| format!("{}/predictions/{}", self.base_url, id)))
    }
}

#[async_trait]
impl PredictionBackend for ReplicateClient {
    async fn predict(
        &self,
        model: &str,
        input: &Value,
        credential: &str,
    ) -> Result<Value, BackendError> {
        let mut prediction = self.create_prediction(model, input, credential).await?;

        while !prediction.status.is_terminal() {
            let Some(url) = self.poll_url(&prediction) else {
                return Err(BackendError::new("Malformed response from Replicate")
                    .with_status(UPSTREAM_UNREACHABLE_STATUS)
                    .with_detail("Prediction has neither an id nor a status URL"));
            };
            tracing::debug!(status = ?prediction.status, "Prediction pending, polling again");
            tokio::time::sleep(self.poll_interval).await;
            prediction = self.fetch_prediction(&url, credential).await?;
        }

        settle(prediction)
    }
}

fn settle(prediction: Prediction) -> Result<Value, BackendError> {
    match prediction.status {
        PredictionStatus::Succeeded => Ok(prediction.output),
        PredictionStatus::Canceled => Err(BackendError::new("Prediction was canceled")),
        _ => {
            let detail = prediction.error_text().unwrap_or_else(|| "Unknown error".to_string());
            Err(BackendError::new("Prediction failed").with_detail(detail))
        },
    }
}

async fn read_prediction(response: reqwest::Response) -> Result<Prediction, BackendError> {
    let status = response.status();
    let text = response.text().await.map_err(transport_error)?;

    if !status.is_success() {
        return Err(api_error(status, &text));
    }

    serde_json::from_str(&text).map_err(|e| {
        BackendError::new("Malformed response from Replicate")
            .with_status(UPSTREAM_UNREACHABLE_STATUS)
            .with_detail(e.to_string())
    })
}

/// Non-2xx -> BackendError carrying the upstream status, title and detail.
fn api_error(status: StatusCode, body: &str) -> BackendError {
    let problem: ApiProblem = serde_json::from_str(body).unwrap_or_default();
    let message = problem
        .title
        .or_else(|| problem.detail.clone())
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| "Replicate API error".to_string());

    let err = BackendError::new(message).with_status(status.as_u16());
    match problem.detail {
        Some(detail) => err.with_detail(detail),
        None => err,
    }
}

fn transport_error(e: reqwest::Error) -> BackendError {
    tracing::error!("Replicate request failed: {}", e);
    BackendError::new("Failed to reach Replicate")
        .with_status(UPSTREAM_UNREACHABLE_STATUS)
        .with_detail(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(value: Value) -> Prediction {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_settle_succeeded_returns_output() {
        let p = prediction(json!({"id": "p1", "status": "succeeded", "output": ["https://x/1.png"]}));
        assert_eq!(settle(p), Ok(json!(["https://x/1.png"])));
    }

    #[test]
    fn test_settle_failed_uses_error_as_detail() {
        let p = prediction(json!({"id": "p1", "status": "failed", "error": "CUDA out of memory"}));
        let err = settle(p).unwrap_err();
        assert_eq!(err.message, "Prediction failed");
        assert_eq!(err.detail_or_message(), "CUDA out of memory");
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_settle_canceled() {
        let p = prediction(json!({"status": "canceled"}));
        assert_eq!(settle(p).unwrap_err().message, "Prediction was canceled");
    }

    #[test]
    fn test_api_error_uses_problem_details() {
        let err = api_error(
            StatusCode::NOT_FOUND,
            r#"{"title":"Model not found","detail":"The requested model could not be found.","status":404}"#,
        );
        assert_eq!(err.message, "Model not found");
        assert_eq!(err.status, Some(404));
        assert_eq!(err.detail.as_deref(), Some("The requested model could not be found."));
    }

    #[test]
    fn test_api_error_detail_only() {
        let err = api_error(StatusCode::UNAUTHORIZED, r#"{"detail":"Invalid token."}"#);
        assert_eq!(err.message, "Invalid token.");
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn test_api_error_non_json_body() {
        let err = api_error(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert_eq!(err.message, "Bad Gateway");
        assert_eq!(err.detail, None);
        assert_eq!(err.status_code(), 502);
    }

    #[test]
    fn test_poll_url_prefers_get_url() {
        let client = ReplicateClient::with_client(Client::new(), "http://api.test/v1/", 10);
        assert_eq!(client.base_url(), "http://api.test/v1");

        let with_url =
            prediction(json!({"id": "abc", "status": "starting", "urls": {"get": "http://x/p/abc"}}));
        assert_eq!(client.poll_url(&with_url).as_deref(), Some("http://x/p/abc"));

        let id_only = prediction(json!({"id": "abc", "status": "processing", "urls": null}));
        assert_eq!(client.poll_url(&id_only).as_deref(), Some("http://api.test/v1/predictions/abc"));

        let neither = prediction(json!({"status": "processing"}));
        assert_eq!(client.poll_url(&neither), None);
    }

    #[test]
    fn test_unknown_status_is_not_terminal() {
        let p = prediction(json!({"status": "queued"}));
        assert_eq!(p.status, PredictionStatus::Unknown);
        assert!(!p.status.is_terminal());
    }
}
