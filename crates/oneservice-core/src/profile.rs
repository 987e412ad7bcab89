//! Profile documents.
//!
//! A loaded profile pairs the parser's output (header and the input/result
//! structures of every use case) with the per-use-case safety information.
//! Both halves come from the same source document but are produced by
//! different parser passes, so they are joined here by use-case name.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::structure::{Documentation, Structure};

/// Fully-qualified profile identifier, `scope/name` or just `name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProfileId {
    pub scope: Option<String>,
    pub name: String,
}

impl ProfileId {
    pub fn new(scope: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            scope: scope.map(str::to_string),
            name: name.into(),
        }
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Some(scope) => write!(f, "{}/{}", scope, self.name),
            None => f.write_str(&self.name),
        }
    }
}

impl FromStr for ProfileId {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LoadError::InvalidProfileId(s.to_string());
        match s.split_once('/') {
            Some((scope, name)) => {
                if scope.is_empty() || name.is_empty() || name.contains('/') {
                    return Err(invalid());
                }
                Ok(Self::new(Some(scope), name))
            }
            None if s.is_empty() => Err(invalid()),
            None => Ok(Self::new(None, s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(flatten)]
    pub doc: Documentation,
}

impl ProfileHeader {
    pub fn id(&self) -> ProfileId {
        ProfileId::new(self.scope.as_deref(), self.name.clone())
    }
}

/// Operation safety as declared in the profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Safety {
    Safe,
    Unsafe,
    Idempotent,
    #[default]
    Unspecified,
}

/// Input and result shapes of one use case.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UseCaseStructure {
    pub use_case_name: String,
    #[serde(default)]
    pub input: Option<Structure>,
    #[serde(default)]
    pub result: Option<Structure>,
    #[serde(flatten)]
    pub doc: Documentation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseCaseInfo {
    pub name: String,
    #[serde(default)]
    pub safety: Safety,
}

/// Parser output for a whole profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProfileOutput {
    pub header: ProfileHeader,
    #[serde(default)]
    pub usecases: Vec<UseCaseStructure>,
    #[serde(flatten)]
    pub doc: Documentation,
}

/// Use-case descriptor: structures joined with safety information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseCase {
    pub name: String,
    pub safety: Safety,
    pub input: Option<Structure>,
    pub result: Option<Structure>,
    pub doc: Documentation,
}

/// A profile as handed over by a [`ProfileLoader`](crate::ProfileLoader).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoadedProfile {
    pub output: ProfileOutput,
    #[serde(rename = "usecases", default)]
    pub use_case_info: Vec<UseCaseInfo>,
}

impl LoadedProfile {
    pub fn id(&self) -> ProfileId {
        self.output.header.id()
    }

    pub fn header(&self) -> &ProfileHeader {
        &self.output.header
    }

    /// Joins every use-case structure with its safety information.
    ///
    /// Fails if the parser output lists a use case that has no matching info
    /// entry.
    pub fn use_cases(&self) -> Result<Vec<UseCase>, LoadError> {
        self.output
            .usecases
            .iter()
            .map(|structure| {
                let info = self
                    .use_case_info
                    .iter()
                    .find(|info| info.name == structure.use_case_name)
                    .ok_or_else(|| LoadError::MissingUseCaseInfo {
                        profile: self.id().to_string(),
                        use_case: structure.use_case_name.clone(),
                    })?;

                Ok(UseCase {
                    name: structure.use_case_name.clone(),
                    safety: info.safety,
                    input: structure.input.clone(),
                    result: structure.result.clone(),
                    doc: structure.doc.clone(),
                })
            })
            .collect()
    }
}
