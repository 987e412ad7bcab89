//! Axum HTTP handlers for the GraphQL endpoint.
//!
//! - `POST /graphql` - Execute a GraphQL request
//! - `GET /graphql` - GraphiQL IDE when enabled, otherwise execute the query
//!   given as URL parameters
//!
//! GraphQL responses are always `200 OK`; failures are reported in `errors`.

use async_graphql::dynamic::Schema;
use async_graphql::http::GraphiQLSource;
use async_graphql::{Request, Response, Variables};
use axum::Json;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse};
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span};

use crate::context::GraphQLContextBuilder;
use crate::engine::DynExecutionEngine;
use crate::error::GraphQLError;

/// Header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// State shared across GraphQL handlers.
#[derive(Clone)]
pub struct GraphQLState {
    pub schema: Schema,

    /// Serve GraphiQL on `GET` requests without a query.
    pub graphiql: bool,

    /// Path GraphiQL sends its requests to.
    pub endpoint: String,

    /// Engine used instead of the one the schema was built with.
    pub engine: Option<DynExecutionEngine>,
}

impl GraphQLState {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            graphiql: false,
            endpoint: "/graphql".to_string(),
            engine: None,
        }
    }

    #[must_use]
    pub fn with_graphiql(mut self, enabled: bool) -> Self {
        self.graphiql = enabled;
        self
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    #[must_use]
    pub fn with_engine(mut self, engine: DynExecutionEngine) -> Self {
        self.engine = Some(engine);
        self
    }
}

/// GraphQL request body.
#[derive(Debug, Deserialize)]
pub struct GraphQLRequest {
    /// The GraphQL query string.
    pub query: String,

    /// Optional operation name for multi-operation documents.
    #[serde(rename = "operationName")]
    pub operation_name: Option<String>,

    /// Optional variables for the query.
    pub variables: Option<serde_json::Value>,
}

/// Query parameters for GET requests.
#[derive(Debug, Default, Deserialize)]
pub struct GraphQLQueryParams {
    pub query: Option<String>,

    #[serde(rename = "operationName")]
    pub operation_name: Option<String>,

    /// Optional variables (JSON string).
    pub variables: Option<String>,
}

/// GraphQL response body.
#[derive(Debug, Serialize)]
pub struct GraphQLResponse {
    pub data: serde_json::Value,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
}

impl From<Response> for GraphQLResponse {
    fn from(resp: Response) -> Self {
        let data = serde_json::to_value(&resp.data).unwrap_or(serde_json::Value::Null);

        // Server errors carry message, locations, path and extensions.
        let errors = resp
            .errors
            .iter()
            .map(|e| {
                serde_json::to_value(e)
                    .unwrap_or_else(|_| serde_json::json!({ "message": e.message }))
            })
            .collect();

        Self {
            data,
            errors,
            extensions: if resp.extensions.is_empty() {
                None
            } else {
                Some(serde_json::to_value(&resp.extensions).unwrap_or(serde_json::Value::Null))
            },
        }
    }
}

/// Handles POST requests to /graphql.
pub async fn graphql_handler(
    State(state): State<GraphQLState>,
    headers: HeaderMap,
    Json(request): Json<GraphQLRequest>,
) -> impl IntoResponse {
    debug!("Processing GraphQL request");
    execute_graphql(state, headers, request).await.into_response()
}

/// Handles GET requests to /graphql.
pub async fn graphql_handler_get(
    State(state): State<GraphQLState>,
    headers: HeaderMap,
    Query(params): Query<GraphQLQueryParams>,
) -> impl IntoResponse {
    if state.graphiql && params.query.is_none() {
        debug!("Serving GraphiQL");
        return Html(GraphiQLSource::build().endpoint(&state.endpoint).finish()).into_response();
    }

    let request = match params_to_request(params) {
        Ok(req) => req,
        Err(e) => {
            return error_response(GraphQLError::InvalidQuery(e.to_string())).into_response();
        }
    };

    debug!("Processing GraphQL GET request");
    execute_graphql(state, headers, request).await.into_response()
}

/// Executes a GraphQL request.
async fn execute_graphql(
    state: GraphQLState,
    headers: HeaderMap,
    request: GraphQLRequest,
) -> impl IntoResponse {
    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let span = info_span!("graphql", request_id = %request_id);
    let mut builder = GraphQLContextBuilder::new()
        .with_request_id(request_id)
        .with_span(span);
    if let Some(engine) = state.engine.clone() {
        builder = builder.with_engine(engine);
    }

    let context = match builder.build() {
        Ok(ctx) => ctx,
        Err(e) => {
            return error_response(GraphQLError::Internal(e.to_string())).into_response();
        }
    };

    let mut gql_request = Request::new(&request.query);

    if let Some(op_name) = request.operation_name {
        gql_request = gql_request.operation_name(op_name);
    }

    if let Some(vars) = request.variables {
        gql_request = gql_request.variables(Variables::from_json(vars));
    }

    gql_request = gql_request.data(context);

    debug!(query = %request.query, "Executing GraphQL query");
    let response = state.schema.execute(gql_request).await;

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(GraphQLResponse::from(response)),
    )
        .into_response()
}

/// Converts GET query params to a GraphQL request.
fn params_to_request(params: GraphQLQueryParams) -> Result<GraphQLRequest, serde_json::Error> {
    let variables = if let Some(vars_str) = params.variables {
        Some(serde_json::from_str(&vars_str)?)
    } else {
        None
    };

    Ok(GraphQLRequest {
        query: params.query.unwrap_or_default(),
        operation_name: params.operation_name,
        variables,
    })
}

/// Returns an error response.
fn error_response(error: GraphQLError) -> impl IntoResponse {
    let status = StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let body = serde_json::json!({
        "errors": [{
            "message": error.to_string(),
            "extensions": { "code": error.error_code() }
        }]
    });

    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
}
