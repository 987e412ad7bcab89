//! Provider configuration types.
//!
//! For a profile with providers `a` and `b` the builder generates:
//!
//! ```graphql
//! input {Profile}ProviderOption {
//!   a: {Profile}ProviderOptionAConfig
//!   b: {Profile}ProviderOptionBConfig
//! }
//!
//! input {Profile}ProviderOptionAConfig {
//!   active: Boolean
//!   parameters: {Profile}ProviderOptionAConfigProviderParameters
//!   security: {Profile}ProviderOptionAConfigProviderSecurity
//! }
//! ```
//!
//! `parameters` lists the union of the parameters declared by all providers
//! of the profile and is omitted when that union is empty. `security` is only
//! present when the provider declares security schemes.

use async_graphql::dynamic::{InputObject, InputValue, TypeRef};
use indexmap::IndexMap;
use oneservice_core::{ProviderDescriptor, SecurityKind, SecurityScheme};
use tracing::debug;

use super::registry::{FieldNames, TypeRegistry, TypeSignature};
use crate::error::SchemaBuildError;
use crate::naming::{is_valid_name, pascalize, sanitize};

/// GraphQL names of one provider mapped back to the names the engine knows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderBinding {
    /// Provider name as configured.
    pub name: String,
    /// Sanitized parameter field name to parameter name.
    pub parameters: IndexMap<String, String>,
    /// Sanitized security field name to security scheme id.
    pub security: IndexMap<String, String>,
}

/// The generated `{Profile}ProviderOption` input type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderOption {
    pub type_name: String,
    /// Option field name to provider.
    pub providers: IndexMap<String, ProviderBinding>,
}

impl ProviderOption {
    pub fn type_ref(&self) -> TypeRef {
        TypeRef::named(&self.type_name)
    }

    pub fn binding(&self, field_name: &str) -> Option<&ProviderBinding> {
        self.providers.get(field_name)
    }
}

/// Parameter name to the providers declaring it, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterUnion {
    entries: IndexMap<String, ParameterEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ParameterEntry {
    providers: Vec<String>,
    description: Option<String>,
}

impl ParameterUnion {
    /// Merges the parameters of `providers`. The last declared description
    /// of a parameter wins.
    pub fn collect<'a>(providers: impl IntoIterator<Item = &'a ProviderDescriptor>) -> Self {
        let mut union = Self::default();
        for provider in providers {
            for parameter in &provider.parameters {
                let entry = union.entries.entry(parameter.name.clone()).or_default();
                if !entry.providers.contains(&provider.name) {
                    entry.providers.push(provider.name.clone());
                }
                if parameter.description.is_some() {
                    entry.description.clone_from(&parameter.description);
                }
            }
        }
        union
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn providers_of(&self, parameter: &str) -> Option<&[String]> {
        self.entries.get(parameter).map(|e| e.providers.as_slice())
    }

    fn description_of(&self, parameter: &str) -> String {
        match self.entries.get(parameter) {
            Some(ParameterEntry {
                description: Some(description),
                ..
            }) => description.clone(),
            Some(entry) => format!("Parameter accepted by {}", entry.providers.join(", ")),
            None => String::new(),
        }
    }
}

/// Builds the provider option input type of a profile.
///
/// Returns `None` when the profile has no configured providers; use cases of
/// such a profile take no `provider` argument.
pub fn build_provider_option(
    registry: &mut TypeRegistry,
    profile_prefix: &str,
    providers: &[ProviderDescriptor],
) -> Result<Option<ProviderOption>, SchemaBuildError> {
    if providers.is_empty() {
        return Ok(None);
    }

    let type_name = format!("{profile_prefix}ProviderOption");
    let mut option = ProviderOption {
        type_name: type_name.clone(),
        providers: IndexMap::new(),
    };
    let mut input = InputObject::new(&type_name);
    let parameters = ParameterUnion::collect(providers);

    let mut field_names = FieldNames::new(&type_name);
    for provider in providers {
        let field_name = sanitize(&provider.name);
        if !is_valid_name(&field_name) {
            return Err(SchemaBuildError::InvalidName(field_name));
        }
        field_names.claim(&field_name)?;

        let config_name = format!("{type_name}{}", pascalize(&field_name));
        let binding = build_provider_config(registry, &config_name, provider, &parameters)?;

        input = input.field(
            InputValue::new(&field_name, TypeRef::named(&config_name))
                .description(format!("Provider {} configuration", provider.name)),
        );
        option.providers.insert(field_name, binding);
    }

    let names: Vec<&str> = providers.iter().map(|p| p.name.as_str()).collect();
    registry.insert(
        &type_name,
        TypeSignature::Fixed(format!("provider-option:{}", names.join(","))),
        input,
    )?;

    debug!(type_name = %type_name, providers = ?names, "Generated provider option type");
    Ok(Some(option))
}

fn build_provider_config(
    registry: &mut TypeRegistry,
    config_name: &str,
    provider: &ProviderDescriptor,
    parameters: &ParameterUnion,
) -> Result<ProviderBinding, SchemaBuildError> {
    let signature = TypeSignature::Fixed(format!("provider-config:{config_name}"));
    let mut binding = ProviderBinding {
        name: provider.name.clone(),
        ..Default::default()
    };

    let mut config = InputObject::new(config_name)
        .field(InputValue::new("active", TypeRef::named(TypeRef::BOOLEAN)));

    if !parameters.is_empty() {
        let parameters_name = format!("{config_name}ProviderParameters");
        let mut parameters_type = InputObject::new(&parameters_name);
        let mut field_names = FieldNames::new(&parameters_name);
        for name in parameters.names() {
            let field_name = sanitize(name);
            if !is_valid_name(&field_name) {
                return Err(SchemaBuildError::InvalidName(field_name));
            }
            field_names.claim(&field_name)?;
            parameters_type = parameters_type.field(
                InputValue::new(&field_name, TypeRef::named(TypeRef::STRING))
                    .description(parameters.description_of(name)),
            );
            binding.parameters.insert(field_name, name.to_string());
        }
        registry.insert(&parameters_name, signature.clone(), parameters_type)?;

        config = config.field(
            InputValue::new("parameters", TypeRef::named(&parameters_name))
                .description("Provider-specific parameters"),
        );
    }

    if !provider.security_schemes.is_empty() {
        let security_name = format!("{config_name}ProviderSecurity");
        let mut security_type = InputObject::new(&security_name);
        let mut field_names = FieldNames::new(&security_name);
        for scheme in &provider.security_schemes {
            let field_name = sanitize(&scheme.id);
            if !is_valid_name(&field_name) {
                return Err(SchemaBuildError::InvalidName(field_name));
            }
            field_names.claim(&field_name)?;
            let values_name = security_values_type(registry, provider, scheme)?;
            security_type = security_type.field(
                InputValue::new(&field_name, TypeRef::named(values_name))
                    .description(format!("Security accepted by {}", provider.name)),
            );
            binding.security.insert(field_name, scheme.id.clone());
        }
        registry.insert(&security_name, signature.clone(), security_type)?;

        config = config.field(
            InputValue::new("security", TypeRef::named(&security_name))
                .description("Provider-specific security"),
        );
    }

    registry.insert(config_name, signature, config)?;
    Ok(binding)
}

/// Credential fields collected for a security scheme kind.
pub fn security_fields(kind: SecurityKind) -> &'static [&'static str] {
    match kind {
        SecurityKind::Basic | SecurityKind::Digest => &["username", "password"],
        SecurityKind::Bearer => &["token"],
        SecurityKind::ApiKey => &["apikey"],
    }
}

fn security_values_type(
    registry: &mut TypeRegistry,
    provider: &ProviderDescriptor,
    scheme: &SecurityScheme,
) -> Result<String, SchemaBuildError> {
    let kind = scheme
        .kind()
        .ok_or_else(|| SchemaBuildError::UnsupportedSecurityScheme {
            provider: provider.name.clone(),
            scheme: scheme.id.clone(),
            kind: scheme.kind_label(),
        })?;

    let name = format!(
        "{}{}SecurityValues",
        pascalize(&sanitize(&provider.name)),
        pascalize(&sanitize(&scheme.id))
    );
    let signature = TypeSignature::Fixed(format!("security-values:{kind:?}"));
    if registry.lookup(&name, &signature)? {
        return Ok(name);
    }

    let values = security_fields(kind).iter().fold(
        InputObject::new(&name),
        |values, field| values.field(InputValue::new(*field, TypeRef::named(TypeRef::STRING))),
    );
    registry.insert(&name, signature, values)?;
    Ok(name)
}
