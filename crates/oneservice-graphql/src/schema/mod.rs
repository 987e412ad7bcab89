//! GraphQL schema building.
//!
//! The schema is compiled from profiles once, at startup.
//!
//! ## Components
//!
//! - [`ProfileSchemaBuilder`] - Assembles the schema from configured profiles
//! - [`build_use_case_field`] - One field per use case
//! - [`build_provider_option`] - Provider configuration input types
//! - [`compile_output_type`] / [`compile_input_type`] - Structure type compiler
//! - [`TypeRegistry`] - Generated types keyed by name
//!
//! ## Architecture
//!
//! The schema building process:
//! 1. Profiles are loaded in configuration order
//! 2. Provider descriptors of each profile become its provider option type
//! 3. Every use case becomes a field on `{Profile}Query` or `{Profile}Mutation`
//! 4. Each profile adds one root field per operation type
//! 5. All generated types are registered and the schema is validated

mod builder;
mod provider_config;
mod registry;
mod structure;
mod use_case;

pub use builder::{ConfiguredProfile, PLACEHOLDER_FIELD, ProfileSchemaBuilder, SchemaBuilderConfig};
pub use provider_config::{
    ParameterUnion, ProviderBinding, ProviderOption, build_provider_option, security_fields,
};
pub use registry::{TypeRegistry, TypeSignature};
pub use structure::{NONE_SCALAR, compile_input_type, compile_output_type, enum_symbol, none_type};
pub use use_case::{OperationType, UseCaseField, build_use_case_field};
