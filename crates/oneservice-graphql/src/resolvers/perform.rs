//! Use-case resolver.
//!
//! Every use-case field resolves through a [`UseCaseBinding`] captured when
//! the schema is built. Per invocation the resolver selects a provider from
//! the `provider` argument, shapes the input, calls the execution engine and
//! wraps the shaped result as `{ result }`.

use std::sync::Arc;

use async_graphql::dynamic::{Field, FieldFuture, FieldValue, ResolverContext, TypeRef};
use async_graphql::{ErrorExtensions, Name, Value};
use indexmap::IndexMap;
use oneservice_core::Structure;
use tracing::{Instrument, Span, debug, info_span, warn};

use super::{graphql_value_to_json, json_to_graphql_value, shape_input, shape_output};
use crate::context::GraphQLContext;
use crate::engine::{DynExecutionEngine, EngineError, PerformError, PerformRequest};
use crate::error::MultipleActiveProvidersError;
use crate::schema::ProviderOption;

/// What a use-case field resolves, fixed at schema build time.
#[derive(Debug, Clone)]
pub struct UseCaseBinding {
    /// Fully-qualified profile id, `scope/name`.
    pub profile_id: String,
    pub use_case: String,
    pub input: Option<Structure>,
    pub result: Option<Structure>,
    pub provider_option: Option<ProviderOption>,
}

/// One entry of the `provider` argument, keyed by original names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderArgument {
    pub active: Option<bool>,
    pub parameters: IndexMap<String, String>,
    pub security: IndexMap<String, serde_json::Value>,
}

/// Picks the provider a request runs against.
///
/// - no entries: none, the engine uses its default
/// - one entry: selected unless it is explicitly `active: false`
/// - several entries: exactly one must be `active: true`
pub fn select_provider<'a>(
    profile_id: &str,
    use_case: &str,
    providers: &'a IndexMap<String, ProviderArgument>,
) -> Result<Option<(&'a str, &'a ProviderArgument)>, MultipleActiveProvidersError> {
    if providers.len() <= 1 {
        return Ok(providers
            .iter()
            .find(|(_, argument)| argument.active != Some(false))
            .map(|(name, argument)| (name.as_str(), argument)));
    }

    let active: Vec<_> = providers
        .iter()
        .filter(|(_, argument)| argument.active == Some(true))
        .collect();

    match active.as_slice() {
        [(name, argument)] => Ok(Some((name.as_str(), *argument))),
        _ => Err(MultipleActiveProvidersError {
            profile: profile_id.to_string(),
            use_case: use_case.to_string(),
            providers: active.iter().map(|(name, _)| (*name).clone()).collect(),
        }),
    }
}

/// Remaps a typed engine failure into a GraphQL error.
///
/// The message falls back to a generic one when empty. `kind`,
/// `properties`, `statusCode` and `response` are copied into the error
/// extensions when present, and the engine error stays available as the
/// error source.
pub fn remap_engine_error(error: EngineError) -> async_graphql::Error {
    let extensions = [
        ("kind", error.kind.clone().map(serde_json::Value::String)),
        ("properties", error.properties.clone()),
        ("statusCode", error.status_code.clone()),
        ("response", error.response.clone()),
    ];

    async_graphql::Error::new_with_source(error).extend_with(|_, ext| {
        for (key, value) in extensions {
            if let Some(value) = value {
                ext.set(key, json_to_graphql_value(value));
            }
        }
    })
}

/// Creates the field of one use case.
pub(crate) fn create_perform_field(
    field_name: &str,
    type_ref: TypeRef,
    binding: UseCaseBinding,
) -> Field {
    let binding = Arc::new(binding);

    Field::new(field_name, type_ref, move |ctx| {
        let binding = binding.clone();
        FieldFuture::new(async move {
            let result = binding.resolve(&ctx).await?;
            Ok(Some(FieldValue::value(result)))
        })
    })
}

impl UseCaseBinding {
    async fn resolve(&self, ctx: &ResolverContext<'_>) -> async_graphql::Result<Value> {
        let request_context = ctx.data_opt::<GraphQLContext>();
        let parent = request_context.map_or_else(Span::current, |c| c.span.clone());
        let span = info_span!(
            parent: &parent,
            "perform",
            profile = %self.profile_id,
            use_case = %self.use_case,
            request_id = request_context.map(|c| c.request_id.as_str()),
        );

        async move {
            let engine = request_context
                .and_then(|c| c.engine.clone())
                .or_else(|| ctx.data_opt::<DynExecutionEngine>().cloned())
                .ok_or_else(|| async_graphql::Error::new("Execution engine not configured"))?;

            let request = self.build_request(ctx)?;
            debug!(
                provider = ?request.provider,
                input = %request.input,
                "Performing use case"
            );

            match engine.perform(request).await {
                Ok(value) => {
                    debug!(result = %value, "Use case performed");
                    let shaped = shape_output(self.result.as_ref(), value);
                    Ok(Value::Object(
                        [(Name::new("result"), shaped)].into_iter().collect(),
                    ))
                }
                Err(PerformError::Engine(error)) => {
                    warn!(error = %error, kind = ?error.kind, "Use case failed");
                    Err(remap_engine_error(error))
                }
                Err(PerformError::Unexpected(message)) => {
                    warn!(error = %message, "Use case failed unexpectedly");
                    Err(async_graphql::Error::new(message))
                }
            }
        }
        .instrument(span)
        .await
    }

    fn build_request(&self, ctx: &ResolverContext<'_>) -> async_graphql::Result<PerformRequest> {
        let input = match ctx.args.get("input") {
            Some(value) => shape_input(self.input.as_ref(), value.as_value()),
            None => serde_json::Value::Object(serde_json::Map::new()),
        };

        let providers = match (&self.provider_option, ctx.args.get("provider")) {
            (Some(option), Some(value)) => parse_provider_argument(option, value.as_value()),
            _ => IndexMap::new(),
        };

        let selected = select_provider(&self.profile_id, &self.use_case, &providers).map_err(
            |err| {
                debug!(error = %err, "Provider selection failed");
                async_graphql::Error::new_with_source(err)
            },
        )?;

        let mut request = PerformRequest {
            profile_id: self.profile_id.clone(),
            use_case: self.use_case.clone(),
            input,
            ..Default::default()
        };
        if let Some((name, argument)) = selected {
            request.provider = Some(name.to_string());
            request.parameters = argument.parameters.clone();
            request.security = argument.security.clone();
        }
        Ok(request)
    }
}

/// Reads the `provider` argument, mapping sanitized names back to the names
/// the engine knows. Unknown and `null` entries are skipped.
fn parse_provider_argument(
    option: &ProviderOption,
    value: &Value,
) -> IndexMap<String, ProviderArgument> {
    let mut providers = IndexMap::new();
    let Value::Object(entries) = value else {
        return providers;
    };

    for (field, config) in entries {
        let (Some(binding), Value::Object(config)) = (option.binding(field.as_str()), config) else {
            continue;
        };

        let mut argument = ProviderArgument {
            active: match member(config, "active") {
                Some(Value::Boolean(active)) => Some(*active),
                _ => None,
            },
            ..Default::default()
        };

        if let Some(Value::Object(parameters)) = member(config, "parameters") {
            for (key, value) in parameters {
                let Value::String(value) = value else { continue };
                let name = binding
                    .parameters
                    .get(key.as_str())
                    .cloned()
                    .unwrap_or_else(|| key.to_string());
                argument.parameters.insert(name, value.clone());
            }
        }

        if let Some(Value::Object(security)) = member(config, "security") {
            for (key, value) in security {
                if matches!(value, Value::Null) {
                    continue;
                }
                let id = binding
                    .security
                    .get(key.as_str())
                    .cloned()
                    .unwrap_or_else(|| key.to_string());
                argument.security.insert(id, graphql_value_to_json(value));
            }
        }

        providers.insert(binding.name.clone(), argument);
    }

    providers
}

fn member<'a>(object: &'a IndexMap<Name, Value>, key: &str) -> Option<&'a Value> {
    object.get(&Name::new(key))
}
