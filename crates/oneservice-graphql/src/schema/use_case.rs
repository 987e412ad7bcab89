//! Use-case field generation.

use async_graphql::dynamic::{Field, InputValue, Object, TypeRef};
use oneservice_core::{ProfileId, Safety, UseCase};
use tracing::debug;

use super::provider_config::ProviderOption;
use super::registry::{TypeRegistry, TypeSignature};
use super::structure::{compile_input_type, compile_output_type, create_field_resolver, none_type};
use crate::error::SchemaBuildError;
use crate::naming::{is_valid_name, sanitize, use_case_prefix};
use crate::resolvers::{UseCaseBinding, create_perform_field};

/// Root operation a use case is exposed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    Query,
    Mutation,
}

impl OperationType {
    /// Only safe use cases are queries.
    pub fn from_safety(safety: Safety) -> Self {
        match safety {
            Safety::Safe => Self::Query,
            Safety::Unsafe | Safety::Idempotent | Safety::Unspecified => Self::Mutation,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "Query",
            Self::Mutation => "Mutation",
        }
    }
}

impl From<Safety> for OperationType {
    fn from(safety: Safety) -> Self {
        Self::from_safety(safety)
    }
}

/// A generated use-case field and where it belongs.
pub struct UseCaseField {
    pub name: String,
    pub operation: OperationType,
    pub field: Field,
}

/// Generates the field of one use case.
///
/// The field returns `{UseCase}Result`, an object with a single `result`
/// field holding the use-case result. It takes an `input` argument when the
/// use case declares input fields and a `provider` argument when the profile
/// has providers.
pub fn build_use_case_field(
    registry: &mut TypeRegistry,
    profile_prefix: &str,
    profile_id: &ProfileId,
    use_case: &UseCase,
    provider_option: Option<&ProviderOption>,
) -> Result<UseCaseField, SchemaBuildError> {
    let field_name = sanitize(&use_case.name);
    if !is_valid_name(&field_name) {
        return Err(SchemaBuildError::InvalidName(field_name));
    }
    let prefix = use_case_prefix(profile_prefix, &use_case.name);

    let node_type = match &use_case.result {
        Some(result) => compile_output_type(registry, &format!("{prefix}ResultNode"), result)?,
        None => none_type(registry)?,
    };

    let result_name = format!("{prefix}Result");
    let wrapper_signature = TypeSignature::Fixed(format!("result-wrapper:{node_type}"));
    if !registry.lookup(&result_name, &wrapper_signature)? {
        let wrapper = Object::new(&result_name)
            .description("Wrapping type to handle many possible types returned as result")
            .field(create_field_resolver("result", node_type));
        registry.insert(&result_name, wrapper_signature, wrapper)?;
    }

    let binding = UseCaseBinding {
        profile_id: profile_id.to_string(),
        use_case: use_case.name.clone(),
        input: use_case.input.clone(),
        result: use_case.result.clone(),
        provider_option: provider_option.cloned(),
    };
    let mut field = create_perform_field(&field_name, TypeRef::named(&result_name), binding);

    if let Some(input) = use_case.input.as_ref().filter(|input| input.has_fields()) {
        let input_type = compile_input_type(registry, &format!("{prefix}Input"), input)?;
        field = field.argument(InputValue::new("input", input_type).description("Use-case inputs"));
    }

    if let Some(option) = provider_option {
        field = field.argument(
            InputValue::new("provider", option.type_ref())
                .description("Provider configuration for perform"),
        );
    }

    if let Some(description) = use_case.doc.render() {
        field = field.description(description);
    }

    let operation = OperationType::from_safety(use_case.safety);
    debug!(
        use_case = %use_case.name,
        operation = operation.as_str(),
        result_type = %result_name,
        "Generated use-case field"
    );

    Ok(UseCaseField {
        name: field_name,
        operation,
        field,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use oneservice_core::{PrimitiveType, Structure};

    fn use_case(safety: Safety, input: Option<Structure>, result: Option<Structure>) -> UseCase {
        UseCase {
            name: "GetWeather".into(),
            safety,
            input,
            result,
            doc: Default::default(),
        }
    }

    #[test]
    fn test_safety_to_operation() {
        assert_eq!(OperationType::from(Safety::Safe), OperationType::Query);
        assert_eq!(OperationType::from(Safety::Unsafe), OperationType::Mutation);
        assert_eq!(OperationType::from(Safety::Idempotent), OperationType::Mutation);
        assert_eq!(OperationType::from(Safety::Unspecified), OperationType::Mutation);
    }

    #[test]
    fn test_use_case_types() {
        let mut registry = TypeRegistry::new();
        let id: ProfileId = "weather/current-city".parse().unwrap();
        let input = Structure::object([("city", Structure::primitive(PrimitiveType::String))]);
        let result = Structure::object([("temperature", Structure::primitive(PrimitiveType::Number))]);

        let generated = build_use_case_field(
            &mut registry,
            "WeatherCurrentCity",
            &id,
            &use_case(Safety::Safe, Some(input), Some(result)),
            None,
        )
        .unwrap();

        assert_eq!(generated.name, "GetWeather");
        assert_eq!(generated.operation, OperationType::Query);
        let names: Vec<_> = registry.names().collect();
        assert_eq!(
            names,
            vec![
                "WeatherCurrentCityGetWeatherResultNode",
                "WeatherCurrentCityGetWeatherResult",
                "WeatherCurrentCityGetWeatherInput",
            ]
        );
    }

    #[test]
    fn test_no_result_uses_none() {
        let mut registry = TypeRegistry::new();
        let id: ProfileId = "weather".parse().unwrap();

        let generated = build_use_case_field(
            &mut registry,
            "Weather",
            &id,
            &use_case(Safety::Unsafe, Some(Structure::object(Vec::<(String, Structure)>::new())), None),
            None,
        )
        .unwrap();

        assert_eq!(generated.operation, OperationType::Mutation);
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["None", "WeatherGetWeatherResult"]);
    }
}
