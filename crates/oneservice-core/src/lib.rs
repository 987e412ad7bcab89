//! # oneservice-core
//!
//! Data model shared by the OneService crates.
//!
//! Profiles arrive here already parsed: this crate only describes their
//! structure AST, the use cases they declare and the providers able to run
//! them, and offers loaders that read those documents from disk.
//!
//! - [`structure`] - Structure AST nodes (primitive, scalar, enum, object, list, non-null)
//! - [`profile`] - Profile documents, use-case structures and safety info
//! - [`provider`] - Provider descriptors (security schemes, parameters)
//! - [`super_json`] - The profiles configuration document
//! - [`loader`] - Profile and provider loader traits with file-system and in-memory implementations

pub mod error;
pub mod loader;
pub mod profile;
pub mod provider;
pub mod structure;
pub mod super_json;

pub use error::{LoadError, StructureError};
pub use loader::{
    DynProfileLoader, DynProviderLoader, FileProfileLoader, FileProviderLoader,
    InMemoryProfileLoader, InMemoryProviderLoader, ProfileLoader, ProviderLoader,
};
pub use profile::{
    LoadedProfile, ProfileHeader, ProfileId, ProfileOutput, Safety, UseCase, UseCaseInfo,
    UseCaseStructure,
};
pub use provider::{ProviderDescriptor, ProviderParameter, SecurityKind, SecurityScheme};
pub use structure::{
    Documentation, EnumLiteral, EnumStructure, EnumValue, ObjectStructure, PrimitiveType,
    Structure,
};
pub use super_json::{ProfileSettings, ProviderSettings, SuperJson, SUPER_JSON_FILE};

/// Result type for loading operations.
pub type Result<T> = std::result::Result<T, LoadError>;
