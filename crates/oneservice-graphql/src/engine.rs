//! Execution engine interface.
//!
//! The engine performs a use case against a provider. Expected failures are
//! reported as [`PerformError::Engine`] carrying a typed [`EngineError`];
//! anything else is [`PerformError::Unexpected`].

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Parameters of one use-case execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformRequest {
    /// Fully-qualified profile id, `scope/name`.
    pub profile_id: String,
    pub use_case: String,
    #[serde(default)]
    pub input: serde_json::Value,
    /// Selected provider; `None` lets the engine choose its default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, String>,
    /// Security values keyed by security scheme id.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub security: IndexMap<String, serde_json::Value>,
}

/// Typed failure reported by the execution engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineError {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<serde_json::Value>,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    #[must_use]
    pub fn with_status_code(mut self, status_code: impl Into<serde_json::Value>) -> Self {
        self.status_code = Some(status_code.into());
        self
    }

    /// Input validation failures are the caller's fault.
    pub fn is_input_validation(&self) -> bool {
        self.kind.as_deref() == Some("InputValidationError")
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            f.write_str("Unknown engine error")
        } else {
            f.write_str(&self.message)
        }
    }
}

impl std::error::Error for EngineError {}

#[derive(Debug, Error)]
pub enum PerformError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("{0}")]
    Unexpected(String),
}

/// Performs use cases against providers.
///
/// A single instance is shared by all in-flight requests.
#[async_trait]
pub trait ExecutionEngine: Send + Sync {
    async fn perform(&self, request: PerformRequest) -> Result<serde_json::Value, PerformError>;
}

pub type DynExecutionEngine = Arc<dyn ExecutionEngine>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serializes_camel_case() {
        let request = PerformRequest {
            profile_id: "weather/current-city".into(),
            use_case: "GetCurrentWeatherInCity".into(),
            input: json!({ "city": "Prague" }),
            provider: Some("wttr-in".into()),
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "profileId": "weather/current-city",
                "useCase": "GetCurrentWeatherInCity",
                "input": { "city": "Prague" },
                "provider": "wttr-in"
            })
        );
    }

    #[test]
    fn test_engine_error_display() {
        assert_eq!(EngineError::new("boom").to_string(), "boom");
        assert_eq!(EngineError::default().to_string(), "Unknown engine error");
    }

    #[test]
    fn test_engine_error_deserialize() {
        let err: EngineError = serde_json::from_value(json!({
            "message": "Bad input",
            "kind": "InputValidationError",
            "statusCode": 400
        }))
        .unwrap();
        assert!(err.is_input_validation());
        assert_eq!(err.status_code, Some(json!(400)));
        assert_eq!(err.properties, None);
    }
}
