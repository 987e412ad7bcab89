//! Execution engine reached over HTTP.
//!
//! Each perform request is POSTed as JSON to `engine.url`. The engine answers
//! with `{"result": ...}` on success or `{"error": {...}}` for a typed failure.

use std::time::Duration;

use async_trait::async_trait;
use oneservice_graphql::{EngineError, ExecutionEngine, PerformError, PerformRequest};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::EngineConfig;

/// Body returned by the engine.
#[derive(Debug, Deserialize)]
struct PerformResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<EngineError>,
}

pub struct RemoteEngine {
    http: reqwest::Client,
    url: String,
}

impl RemoteEngine {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self, reqwest::Error> {
        Self::new(
            config.url.clone(),
            Duration::from_millis(config.timeout_ms),
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ExecutionEngine for RemoteEngine {
    async fn perform(&self, request: PerformRequest) -> Result<Value, PerformError> {
        debug!(
            url = %self.url,
            profile = %request.profile_id,
            use_case = %request.use_case,
            "Sending perform request"
        );

        let resp = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| PerformError::Unexpected(format!("Failed to reach execution engine: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| PerformError::Unexpected(format!("Failed to read engine response: {e}")))?;

        let parsed: Option<PerformResponse> = serde_json::from_str(&body).ok();

        match parsed {
            Some(PerformResponse {
                error: Some(error), ..
            }) => {
                debug!(status = status.as_u16(), kind = ?error.kind, "Engine reported failure");
                Err(PerformError::Engine(error))
            }
            Some(PerformResponse { result, .. }) if status.is_success() => {
                Ok(result.unwrap_or(Value::Null))
            }
            _ => {
                warn!(status = status.as_u16(), "Unexpected engine response");
                Err(PerformError::Unexpected(format!(
                    "Execution engine responded with status {}",
                    status.as_u16()
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> PerformRequest {
        PerformRequest {
            profile_id: "weather/current-city".into(),
            use_case: "GetWeather".into(),
            input: json!({ "city": "Prague" }),
            provider: Some("wttr-in".into()),
            ..Default::default()
        }
    }

    async fn engine_for(server: &MockServer) -> RemoteEngine {
        RemoteEngine::new(format!("{}/perform", server.uri()), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_success_returns_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/perform"))
            .and(body_json(json!({
                "profileId": "weather/current-city",
                "useCase": "GetWeather",
                "input": { "city": "Prague" },
                "provider": "wttr-in"
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "result": { "temperature": 20 } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let engine = engine_for(&server).await;
        let result = engine.perform(request()).await.unwrap();
        assert_eq!(result, json!({ "temperature": 20 }));
    }

    #[tokio::test]
    async fn test_missing_result_is_null() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let engine = engine_for(&server).await;
        assert_eq!(engine.perform(request()).await.unwrap(), Value::Null);
    }

    #[tokio::test]
    async fn test_error_body_is_engine_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "message": "Input validation failed",
                    "kind": "InputValidationError",
                    "statusCode": 400
                }
            })))
            .mount(&server)
            .await;

        let engine = engine_for(&server).await;
        match engine.perform(request()).await {
            Err(PerformError::Engine(err)) => {
                assert_eq!(err.message, "Input validation failed");
                assert!(err.is_input_validation());
                assert_eq!(err.status_code, Some(json!(400)));
            }
            other => panic!("expected engine error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_without_body_is_unexpected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let engine = engine_for(&server).await;
        match engine.perform(request()).await {
            Err(PerformError::Unexpected(msg)) => assert!(msg.contains("502")),
            other => panic!("expected unexpected error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_timeout_is_unexpected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "result": 1 }))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let engine =
            RemoteEngine::new(format!("{}/perform", server.uri()), Duration::from_millis(50))
                .unwrap();
        assert!(matches!(
            engine.perform(request()).await,
            Err(PerformError::Unexpected(_))
        ));
    }
}
