//! Integration tests for the profile schema.
//!
//! These tests build schemas from in-memory profiles and execute queries
//! against a mock execution engine.

use std::sync::{Arc, Mutex};

use assert_json_diff::assert_json_include;
use async_graphql::Request;
use async_graphql::dynamic::Schema;
use async_trait::async_trait;
use oneservice_core::{InMemoryProfileLoader, InMemoryProviderLoader, LoadedProfile, ProviderDescriptor};
use oneservice_graphql::{
    DynExecutionEngine, EngineError, ExecutionEngine, GraphQLContext, PerformError,
    PerformRequest, ProfileSchemaBuilder, SchemaBuilderConfig,
};
use serde_json::json;

// =============================================================================
// Mock Engine
// =============================================================================

type Responder = Box<dyn Fn(&PerformRequest) -> Result<serde_json::Value, PerformError> + Send + Sync>;

/// Records every request and answers with a fixed responder.
struct MockEngine {
    requests: Mutex<Vec<PerformRequest>>,
    responder: Responder,
}

impl MockEngine {
    fn new(
        responder: impl Fn(&PerformRequest) -> Result<serde_json::Value, PerformError>
        + Send
        + Sync
        + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        })
    }

    fn returning(value: serde_json::Value) -> Arc<Self> {
        Self::new(move |_| Ok(value.clone()))
    }

    fn requests(&self) -> Vec<PerformRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExecutionEngine for MockEngine {
    async fn perform(&self, request: PerformRequest) -> Result<serde_json::Value, PerformError> {
        let response = (self.responder)(&request);
        self.requests.lock().unwrap().push(request);
        response
    }
}

// =============================================================================
// Fixtures
// =============================================================================

fn weather_profile() -> LoadedProfile {
    serde_json::from_value(json!({
        "output": {
            "header": {
                "scope": "weather",
                "name": "current-city",
                "version": "1.0.0",
                "title": "Current weather in city"
            },
            "usecases": [{
                "useCaseName": "GetWeather",
                "title": "Retrieve current weather",
                "input": {
                    "kind": "ObjectStructure",
                    "fields": {
                        "city": {
                            "kind": "NonNullStructure",
                            "value": { "kind": "PrimitiveStructure", "type": "string" }
                        }
                    }
                },
                "result": {
                    "kind": "ObjectStructure",
                    "fields": {
                        "temperature": { "kind": "PrimitiveStructure", "type": "number" },
                        "feels-like": { "kind": "PrimitiveStructure", "type": "number" },
                        "unit": {
                            "kind": "EnumStructure",
                            "enums": [
                                { "name": "CELSIUS", "value": "C" },
                                { "name": "FAHRENHEIT", "value": "F" }
                            ]
                        }
                    }
                }
            }]
        },
        "usecases": [{ "name": "GetWeather", "safety": "safe" }]
    }))
    .unwrap()
}

fn notes_profile() -> LoadedProfile {
    serde_json::from_value(json!({
        "output": {
            "header": { "scope": "notes", "name": "create-note" },
            "usecases": [{
                "useCaseName": "CreateNote",
                "input": {
                    "kind": "ObjectStructure",
                    "fields": { "text": { "kind": "PrimitiveStructure", "type": "string" } }
                }
            }]
        },
        "usecases": [{ "name": "CreateNote", "safety": "unsafe" }]
    }))
    .unwrap()
}

fn provider(value: serde_json::Value) -> ProviderDescriptor {
    serde_json::from_value(value).unwrap()
}

fn providers() -> InMemoryProviderLoader {
    InMemoryProviderLoader::new()
        .with_provider(provider(json!({
            "name": "wttr-in",
            "parameters": [{ "name": "api-version" }],
            "securitySchemes": [{ "id": "api-key", "type": "apiKey", "in": "query", "name": "key" }]
        })))
        .with_provider(provider(json!({ "name": "mock" })))
}

async fn build_schema(engine: DynExecutionEngine, weather_providers: &[&str]) -> Schema {
    let profiles = InMemoryProfileLoader::new()
        .with_profile(weather_profile())
        .with_profile(notes_profile());

    ProfileSchemaBuilder::new(
        Arc::new(profiles),
        Arc::new(providers()),
        engine,
        SchemaBuilderConfig::default(),
    )
    .with_profile("weather/current-city", weather_providers.iter().copied())
    .with_profile("notes/create-note", Vec::<String>::new())
    .build()
    .await
    .unwrap()
}

async fn execute(schema: &Schema, query: &str) -> async_graphql::Response {
    schema.execute(Request::new(query)).await
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_single_safe_profile_without_providers() {
    let engine = MockEngine::returning(json!(null));
    let profiles = InMemoryProfileLoader::new().with_profile(weather_profile());

    let schema = ProfileSchemaBuilder::new(
        Arc::new(profiles),
        Arc::new(InMemoryProviderLoader::new()),
        engine,
        SchemaBuilderConfig::default(),
    )
    .with_profile("weather/current-city", Vec::<String>::new())
    .build()
    .await
    .unwrap();

    let response = execute(
        &schema,
        "{ __schema { queryType { fields { name } } mutationType { name } } }",
    )
    .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    assert_eq!(
        response.data.into_json().unwrap(),
        json!({
            "__schema": {
                "queryType": { "fields": [{ "name": "WeatherCurrentCity" }] },
                "mutationType": null
            }
        })
    );

    let sdl = schema.sdl();
    assert!(!sdl.contains("provider:"), "no providers, no provider argument");
}

#[tokio::test]
async fn test_generated_sdl() {
    let schema = build_schema(MockEngine::returning(json!(null)), &["wttr-in", "mock"]).await;
    let sdl = schema.sdl();

    for expected in [
        "type Query",
        "type Mutation",
        "WeatherCurrentCity: WeatherCurrentCityQuery",
        "NotesCreateNote: NotesCreateNoteMutation",
        "type WeatherCurrentCityGetWeatherResult",
        "type WeatherCurrentCityGetWeatherResultNode",
        "feels_like: Int",
        "enum WeatherCurrentCityGetWeatherResultNodeUnit",
        "input WeatherCurrentCityGetWeatherInput",
        "city: String!",
        "input WeatherCurrentCityProviderOption",
        "wttr_in: WeatherCurrentCityProviderOptionWttrInConfig",
        "input WeatherCurrentCityProviderOptionWttrInConfigProviderParameters",
        "api_version: String",
        "input WttrInApiKeySecurityValues",
        "apikey: String",
        "scalar None",
    ] {
        assert!(sdl.contains(expected), "SDL should contain `{expected}`:\n{sdl}");
    }
}

#[tokio::test]
async fn test_query_resolves_through_engine() {
    let engine = MockEngine::returning(json!({
        "temperature": 21,
        "feels-like": 19,
        "unit": "C",
        "humidity": 40
    }));
    let schema = build_schema(engine.clone(), &[]).await;

    let response = execute(
        &schema,
        r#"{
            WeatherCurrentCity {
                GetWeather(input: { city: "Prague" }) {
                    result { temperature feels_like unit }
                }
            }
        }"#,
    )
    .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    assert_eq!(
        response.data.into_json().unwrap(),
        json!({
            "WeatherCurrentCity": {
                "GetWeather": {
                    "result": { "temperature": 21, "feels_like": 19, "unit": "CELSIUS" }
                }
            }
        })
    );

    let requests = engine.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].profile_id, "weather/current-city");
    assert_eq!(requests[0].use_case, "GetWeather");
    assert_eq!(requests[0].input, json!({ "city": "Prague" }));
    assert_eq!(requests[0].provider, None);
}

#[tokio::test]
async fn test_selected_provider_is_passed_with_original_names() {
    let engine = MockEngine::returning(json!({ "temperature": 5 }));
    let schema = build_schema(engine.clone(), &["wttr-in", "mock"]).await;

    let response = execute(
        &schema,
        r#"{
            WeatherCurrentCity {
                GetWeather(
                    input: { city: "Brno" }
                    provider: {
                        wttr_in: {
                            active: true
                            parameters: { api_version: "2" }
                            security: { api_key: { apikey: "secret" } }
                        }
                        mock: {}
                    }
                ) { result { temperature } }
            }
        }"#,
    )
    .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    let requests = engine.requests();
    assert_eq!(requests[0].provider.as_deref(), Some("wttr-in"));
    assert_eq!(requests[0].parameters.get("api-version").map(String::as_str), Some("2"));
    assert_eq!(
        requests[0].security.get("api-key"),
        Some(&json!({ "apikey": "secret" }))
    );
}

#[tokio::test]
async fn test_multiple_active_providers_is_a_field_error() {
    let engine = MockEngine::returning(json!({}));
    let schema = build_schema(engine.clone(), &["wttr-in", "mock"]).await;

    let response = execute(
        &schema,
        r#"{
            WeatherCurrentCity {
                GetWeather(
                    input: { city: "Brno" }
                    provider: { wttr_in: { active: true }, mock: { active: true } }
                ) { result { temperature } }
            }
        }"#,
    )
    .await;

    assert_eq!(response.errors.len(), 1);
    assert_eq!(
        response.errors[0].message,
        "Multiple active providers for weather/current-city/GetWeather: [wttr-in, mock]. Set active: true on exactly one provider"
    );
    assert_eq!(
        response.data.into_json().unwrap(),
        json!({ "WeatherCurrentCity": { "GetWeather": null } })
    );
    assert!(engine.requests().is_empty());
}

#[tokio::test]
async fn test_engine_error_is_remapped() {
    let engine = MockEngine::new(|_| {
        Err(EngineError::new("City not found")
            .with_kind("InputValidationError")
            .with_status_code(400)
            .into())
    });
    let schema = build_schema(engine, &[]).await;

    let response = execute(
        &schema,
        r#"{ WeatherCurrentCity { GetWeather(input: { city: "Atlantis" }) { result { temperature } } } }"#,
    )
    .await;

    assert_eq!(response.errors.len(), 1);
    let error = &response.errors[0];
    assert_eq!(error.message, "City not found");

    let source = error.source::<EngineError>().unwrap();
    assert_eq!(source.kind.as_deref(), Some("InputValidationError"));

    assert_json_include!(
        actual: serde_json::to_value(error).unwrap(),
        expected: json!({
            "message": "City not found",
            "path": ["WeatherCurrentCity", "GetWeather"],
            "extensions": { "kind": "InputValidationError", "statusCode": 400 }
        })
    );
}

#[tokio::test]
async fn test_unexpected_error_propagates_message() {
    let engine = MockEngine::new(|_| Err(PerformError::Unexpected("connection reset".into())));
    let schema = build_schema(engine, &[]).await;

    let response = execute(
        &schema,
        r#"{ WeatherCurrentCity { GetWeather(input: { city: "Oslo" }) { result { unit } } } }"#,
    )
    .await;

    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].message, "connection reset");
    assert!(response.errors[0].extensions.is_none());
}

#[tokio::test]
async fn test_mutation_without_result_resolves_null() {
    let engine = MockEngine::returning(json!({ "id": 1 }));
    let schema = build_schema(engine.clone(), &[]).await;

    let response = execute(
        &schema,
        r#"mutation { NotesCreateNote { CreateNote(input: { text: "hello" }) { result } } }"#,
    )
    .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    assert_eq!(
        response.data.into_json().unwrap(),
        json!({ "NotesCreateNote": { "CreateNote": { "result": null } } })
    );
    assert_eq!(engine.requests()[0].input, json!({ "text": "hello" }));
}

#[tokio::test]
async fn test_context_engine_overrides_schema_engine() {
    let default_engine = MockEngine::returning(json!({ "temperature": 1 }));
    let tenant_engine = MockEngine::returning(json!({ "temperature": 2 }));
    let schema = build_schema(default_engine.clone(), &[]).await;

    let context = GraphQLContext::builder()
        .with_request_id("req-1")
        .with_engine(tenant_engine.clone())
        .build()
        .unwrap();

    let response = schema
        .execute(
            Request::new(
                r#"{ WeatherCurrentCity { GetWeather(input: { city: "Rome" }) { result { temperature } } } }"#,
            )
            .data(context),
        )
        .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    assert_eq!(
        response.data.into_json().unwrap(),
        json!({ "WeatherCurrentCity": { "GetWeather": { "result": { "temperature": 2 } } } })
    );
    assert!(default_engine.requests().is_empty());
    assert_eq!(tenant_engine.requests().len(), 1);
}

#[tokio::test]
async fn test_schema_build_is_idempotent() {
    let first = build_schema(MockEngine::returning(json!(null)), &["wttr-in", "mock"]).await;
    let second = build_schema(MockEngine::returning(json!(null)), &["wttr-in", "mock"]).await;
    assert_eq!(first.sdl(), second.sdl());
}
