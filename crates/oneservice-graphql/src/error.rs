//! Error types for the GraphQL layer.
//!
//! Build-time failures are fatal and abort startup. Request-time failures
//! surface as GraphQL field errors; [`GraphQLError`] covers the transport
//! failures that happen before a request reaches the schema.

use std::fmt;

use oneservice_core::LoadError;
use thiserror::Error;

/// Errors raised while compiling profiles into a schema.
#[derive(Debug, Error)]
pub enum SchemaBuildError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Unsupported security scheme '{scheme}' of kind {kind} for provider {provider}")]
    UnsupportedSecurityScheme {
        provider: String,
        scheme: String,
        kind: String,
    },

    #[error("Enum {type_name} defines value {symbol} more than once")]
    DuplicateEnumValue { type_name: String, symbol: String },

    #[error("Type {type_name} defines field {field} more than once")]
    DuplicateFieldName { type_name: String, field: String },

    #[error("Type {0} is generated with two different definitions")]
    TypeNameConflict(String),

    #[error("Profile name collision in {root}: {field}")]
    RootFieldCollision { root: &'static str, field: String },

    #[error("Generated name '{0}' is not a valid GraphQL name")]
    InvalidName(String),

    #[error("Schema validation failed: {0}")]
    Schema(String),
}

/// Raised when the provider argument does not pick exactly one provider.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error(
    "Multiple active providers for {profile}/{use_case}: [{}]. Set active: true on exactly one provider",
    .providers.join(", ")
)]
pub struct MultipleActiveProvidersError {
    pub profile: String,
    pub use_case: String,
    pub providers: Vec<String>,
}

/// Transport-level errors of the GraphQL endpoints.
#[derive(Debug)]
pub enum GraphQLError {
    /// Schema build failed.
    SchemaBuildFailed(String),

    /// Invalid query or request parameters.
    InvalidQuery(String),

    /// Internal server error.
    Internal(String),
}

impl fmt::Display for GraphQLError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SchemaBuildFailed(msg) => {
                write!(f, "Failed to build GraphQL schema: {msg}")
            }
            Self::InvalidQuery(msg) => {
                write!(f, "Invalid GraphQL query: {msg}")
            }
            Self::Internal(msg) => {
                write!(f, "Internal error: {msg}")
            }
        }
    }
}

impl std::error::Error for GraphQLError {}

impl GraphQLError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::SchemaBuildFailed(_) => 500,
            Self::InvalidQuery(_) => 400,
            Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for GraphQL error extensions.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SchemaBuildFailed(_) => "SCHEMA_BUILD_FAILED",
            Self::InvalidQuery(_) => "INVALID_QUERY",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<SchemaBuildError> for GraphQLError {
    fn from(err: SchemaBuildError) -> Self {
        Self::SchemaBuildFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(GraphQLError::InvalidQuery("test".into()).status_code(), 400);
        assert_eq!(GraphQLError::Internal("test".into()).status_code(), 500);
        assert_eq!(
            GraphQLError::SchemaBuildFailed("test".into()).status_code(),
            500
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            GraphQLError::InvalidQuery("test".into()).error_code(),
            "INVALID_QUERY"
        );
        let err: GraphQLError = SchemaBuildError::TypeNameConflict("A".into()).into();
        assert_eq!(err.error_code(), "SCHEMA_BUILD_FAILED");
        assert!(err.to_string().contains("Type A is generated"));
    }

    #[test]
    fn test_multiple_active_providers_message() {
        let err = MultipleActiveProvidersError {
            profile: "weather/current-city".into(),
            use_case: "GetCurrentWeatherInCity".into(),
            providers: vec!["wttr-in".into(), "mock".into()],
        };
        assert_eq!(
            err.to_string(),
            "Multiple active providers for weather/current-city/GetCurrentWeatherInCity: [wttr-in, mock]. Set active: true on exactly one provider"
        );
    }
}
