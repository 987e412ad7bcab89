//! Profile schema builder.
//!
//! [`ProfileSchemaBuilder`] compiles every configured profile into one
//! GraphQL schema with async-graphql's dynamic schema API. The schema is built
//! once at startup; any failure aborts the build.

use std::collections::HashMap;

use async_graphql::Value;
use async_graphql::dynamic::{Field, FieldFuture, Object, Schema, TypeRef};
use indexmap::IndexMap;
use oneservice_core::{
    DynProfileLoader, DynProviderLoader, LoadedProfile, ProviderDescriptor, SuperJson,
};
use tracing::{debug, info};

use super::provider_config::build_provider_option;
use super::registry::{FieldNames, TypeRegistry, TypeSignature};
use super::use_case::{OperationType, build_use_case_field};
use crate::engine::DynExecutionEngine;
use crate::error::SchemaBuildError;
use crate::naming::{profile_prefix, sanitize};

/// Field added to an otherwise empty Query root.
pub const PLACEHOLDER_FIELD: &str = "_placeholder";

/// Configuration for the schema builder.
#[derive(Debug, Clone)]
pub struct SchemaBuilderConfig {
    /// Maximum query depth allowed.
    pub max_depth: usize,

    /// Maximum query complexity allowed.
    pub max_complexity: usize,

    /// Whether to enable introspection queries.
    pub introspection_enabled: bool,
}

impl Default for SchemaBuilderConfig {
    fn default() -> Self {
        Self {
            max_depth: 15,
            max_complexity: 500,
            introspection_enabled: true,
        }
    }
}

/// A profile to compile and the providers configured for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredProfile {
    pub id: String,
    pub providers: Vec<String>,
}

/// Builds the GraphQL schema of the configured profiles.
///
/// Each profile contributes one root field per operation type, named by the
/// profile prefix, whose type holds the profile's use-case fields:
///
/// ```graphql
/// type Query {
///   WeatherCurrentCity: WeatherCurrentCityQuery
/// }
///
/// type WeatherCurrentCityQuery {
///   GetCurrentWeatherInCity(input: ..., provider: ...): WeatherCurrentCityGetCurrentWeatherInCityResult
/// }
/// ```
///
/// # Example
///
/// ```ignore
/// let schema = ProfileSchemaBuilder::new(profiles, providers, engine, SchemaBuilderConfig::default())
///     .with_super_json(&super_json)
///     .build()
///     .await?;
/// ```
pub struct ProfileSchemaBuilder {
    profiles: Vec<ConfiguredProfile>,
    profile_loader: DynProfileLoader,
    provider_loader: DynProviderLoader,
    engine: DynExecutionEngine,
    config: SchemaBuilderConfig,
}

/// Root fields collected while compiling profiles.
#[derive(Default)]
struct RootFields {
    query: IndexMap<String, Field>,
    mutation: IndexMap<String, Field>,
}

impl RootFields {
    fn of(&mut self, operation: OperationType) -> &mut IndexMap<String, Field> {
        match operation {
            OperationType::Query => &mut self.query,
            OperationType::Mutation => &mut self.mutation,
        }
    }
}

impl ProfileSchemaBuilder {
    /// Creates a new schema builder without profiles.
    #[must_use]
    pub fn new(
        profile_loader: DynProfileLoader,
        provider_loader: DynProviderLoader,
        engine: DynExecutionEngine,
        config: SchemaBuilderConfig,
    ) -> Self {
        Self {
            profiles: Vec::new(),
            profile_loader,
            provider_loader,
            engine,
            config,
        }
    }

    /// Adds a profile with its providers.
    #[must_use]
    pub fn with_profile<I, S>(mut self, id: impl Into<String>, providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.profiles.push(ConfiguredProfile {
            id: id.into(),
            providers: providers.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Adds every profile of `super.json` in document order.
    #[must_use]
    pub fn with_super_json(self, super_json: &SuperJson) -> Self {
        super_json
            .profiles
            .iter()
            .fold(self, |builder, (id, settings)| {
                builder.with_profile(id.clone(), settings.providers.keys().cloned())
            })
    }

    pub fn profiles(&self) -> &[ConfiguredProfile] {
        &self.profiles
    }

    /// Builds the GraphQL schema.
    ///
    /// Profiles are loaded one after another in configuration order.
    ///
    /// # Errors
    ///
    /// Returns an error if a profile or provider cannot be loaded, a
    /// structure cannot be compiled, two profiles claim the same root field
    /// or the resulting schema is invalid.
    pub async fn build(&self) -> Result<Schema, SchemaBuildError> {
        debug!(profiles = self.profiles.len(), "Starting GraphQL schema build");

        let mut registry = TypeRegistry::new();
        let mut roots = RootFields::default();
        let mut providers: HashMap<String, ProviderDescriptor> = HashMap::new();

        for configured in &self.profiles {
            let profile = self.profile_loader.load(&configured.id).await?;

            let mut descriptors = Vec::with_capacity(configured.providers.len());
            for name in &configured.providers {
                let descriptor = match providers.get(name) {
                    Some(descriptor) => descriptor.clone(),
                    None => {
                        let descriptor = self.provider_loader.load(name).await?;
                        providers.insert(name.clone(), descriptor.clone());
                        descriptor
                    }
                };
                descriptors.push(descriptor);
            }

            add_profile(&mut registry, &mut roots, &profile, &descriptors)?;
        }

        let has_mutation = !roots.mutation.is_empty();
        let mut schema_builder =
            Schema::build("Query", has_mutation.then_some("Mutation"), None);
        let type_count = registry.len();
        schema_builder = registry.register_all(schema_builder);

        let mut query = Object::new("Query").description("Profile's safe use-cases");
        if roots.query.is_empty() {
            query = query.field(placeholder_field());
        }
        for (_, field) in roots.query {
            query = query.field(field);
        }
        schema_builder = schema_builder.register(query);

        if has_mutation {
            let mutation = roots.mutation.into_values().fold(
                Object::new("Mutation").description("Profile's unsafe and idempotent use-cases"),
                Object::field,
            );
            schema_builder = schema_builder.register(mutation);
        }

        // Configure limits
        let mut schema_builder = schema_builder
            .limit_depth(self.config.max_depth)
            .limit_complexity(self.config.max_complexity);

        if !self.config.introspection_enabled {
            schema_builder = schema_builder.disable_introspection();
        }

        // Default engine; a request context may override it.
        schema_builder = schema_builder.data(self.engine.clone());

        let schema = schema_builder
            .finish()
            .map_err(|e| SchemaBuildError::Schema(e.to_string()))?;

        info!(
            profiles = self.profiles.len(),
            types = type_count,
            mutation = has_mutation,
            "GraphQL schema build complete"
        );
        Ok(schema)
    }
}

/// Compiles one profile and adds its root fields.
fn add_profile(
    registry: &mut TypeRegistry,
    roots: &mut RootFields,
    profile: &LoadedProfile,
    providers: &[ProviderDescriptor],
) -> Result<(), SchemaBuildError> {
    let id = profile.id();
    let prefix = profile_prefix(&id);
    let use_cases = profile.use_cases()?;

    for operation in [OperationType::Query, OperationType::Mutation] {
        let contributes = use_cases
            .iter()
            .any(|use_case| OperationType::from_safety(use_case.safety) == operation);
        if contributes && roots.of(operation).contains_key(&prefix) {
            return Err(SchemaBuildError::RootFieldCollision {
                root: operation.as_str(),
                field: prefix,
            });
        }
    }

    debug!(profile = %id, prefix = %prefix, use_cases = use_cases.len(), "Compiling profile");

    let provider_option = build_provider_option(registry, &prefix, providers)?;

    let query_type = format!("{prefix}{}", OperationType::Query.as_str());
    let mutation_type = format!("{prefix}{}", OperationType::Mutation.as_str());
    let mut query_names = FieldNames::new(&query_type);
    let mut mutation_names = FieldNames::new(&mutation_type);

    let mut fields: IndexMap<OperationType, Vec<Field>> = IndexMap::new();
    for use_case in &use_cases {
        let field_names = match OperationType::from_safety(use_case.safety) {
            OperationType::Query => &mut query_names,
            OperationType::Mutation => &mut mutation_names,
        };
        field_names.claim(&sanitize(&use_case.name))?;

        let generated =
            build_use_case_field(registry, &prefix, &id, use_case, provider_option.as_ref())?;
        fields.entry(generated.operation).or_default().push(generated.field);
    }

    let object_description = profile.output.doc.render();
    let header_description = profile.header().doc.render();
    for (operation, fields) in fields {
        let type_name = format!("{prefix}{}", operation.as_str());
        let mut object = fields.into_iter().fold(Object::new(&type_name), Object::field);
        if let Some(description) = &object_description {
            object = object.description(description.clone());
        }
        registry.insert(
            &type_name,
            TypeSignature::Fixed(format!("profile-{}:{id}", operation.as_str())),
            object,
        )?;

        let mut field = profile_field(&prefix, &type_name);
        if let Some(description) = &header_description {
            field = field.description(description.clone());
        }
        roots.of(operation).insert(prefix.clone(), field);
    }

    Ok(())
}

/// Root field of one profile, resolving to an empty object that holds the
/// use-case fields.
fn profile_field(prefix: &str, type_name: &str) -> Field {
    Field::new(prefix, TypeRef::named(type_name), |_| {
        FieldFuture::new(async { Ok(Some(Value::Object(Default::default()))) })
    })
}

fn placeholder_field() -> Field {
    Field::new(PLACEHOLDER_FIELD, TypeRef::named(TypeRef::STRING), |_| {
        FieldFuture::new(async { Ok(None::<Value>) })
    })
    .description("Placeholder, no profile declares a safe use case")
}
