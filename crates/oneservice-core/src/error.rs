use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while turning raw JSON into structure nodes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StructureError {
    #[error("Unsupported structure kind: {0}")]
    UnsupportedKind(String),

    #[error("{kind} is missing required member '{member}'")]
    MissingMember { kind: &'static str, member: &'static str },
}

/// Errors raised by profile and provider loaders.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Profile {0} is not configured")]
    ProfileNotConfigured(String),

    #[error("Provider {0} couldn't be resolved")]
    ProviderNotResolved(String),

    #[error("Provider file declares name '{found}', expected '{expected}'")]
    ProviderNameMismatch { expected: String, found: String },

    #[error("Profile {0} has no local file")]
    ProfileFileMissing(String),

    #[error("Missing use case information for {use_case} in profile {profile}")]
    MissingUseCaseInfo { profile: String, use_case: String },

    #[error("Invalid profile id: {0}")]
    InvalidProfileId(String),
}

impl LoadError {
    /// Create a new Io error for the given path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a new Parse error for the given path
    pub fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }
}
