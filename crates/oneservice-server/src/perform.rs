//! `POST /perform`: runs a use case directly, bypassing GraphQL.
//!
//! Request body:
//!
//! ```json
//! { "profile": "weather/current-city", "useCase": "GetWeather", "provider": "wttr-in", "input": {} }
//! ```
//!
//! On success the raw use-case result is returned. Failures are reported as
//! `{ "title": ..., "detail": ... }`.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use oneservice_graphql::{DynExecutionEngine, PerformError, PerformRequest};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformParams {
    pub profile: Option<String>,
    pub use_case: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    pub input: Option<Value>,
}

impl PerformParams {
    /// Converts the body into an engine request, naming every missing field.
    fn into_request(self) -> Result<PerformRequest, String> {
        let mut missing = Vec::new();
        if self.profile.is_none() {
            missing.push("profile");
        }
        if self.use_case.is_none() {
            missing.push("useCase");
        }
        if self.input.is_none() {
            missing.push("input");
        }
        match (self.profile, self.use_case, self.input) {
            (Some(profile_id), Some(use_case), Some(input)) => Ok(PerformRequest {
                profile_id,
                use_case,
                input,
                provider: self.provider,
                ..Default::default()
            }),
            _ => Err(format!("missing required field(s): {}", missing.join(", "))),
        }
    }
}

pub async fn perform_route(
    State(engine): State<DynExecutionEngine>,
    Json(params): Json<PerformParams>,
) -> Response {
    debug!(?params, "Perform params");

    let request = match params.into_request() {
        Ok(r) => r,
        Err(detail) => return problem(StatusCode::BAD_REQUEST, "Invalid request", &detail),
    };

    match engine.perform(request).await {
        Ok(result) => {
            debug!(%result, "Perform result");
            (StatusCode::OK, Json(result)).into_response()
        }
        Err(PerformError::Engine(err)) => {
            warn!(kind = ?err.kind, error = %err, "Perform failed");
            let status = if err.is_input_validation() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            let title = err.kind.as_deref().unwrap_or("EngineError");
            problem(status, title, &err.to_string())
        }
        Err(PerformError::Unexpected(msg)) => {
            warn!(error = %msg, "Perform failed unexpectedly");
            problem(StatusCode::INTERNAL_SERVER_ERROR, "UnexpectedError", &msg)
        }
    }
}

fn problem(status: StatusCode, title: &str, detail: &str) -> Response {
    (status, Json(json!({ "title": title, "detail": detail }))).into_response()
}
