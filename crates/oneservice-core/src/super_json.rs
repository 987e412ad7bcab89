//! The profiles configuration document (`super.json`).
//!
//! ```json
//! {
//!   "profiles": {
//!     "starwars/character-information": {
//!       "file": "profiles/character-information.json",
//!       "providers": { "swapi": {} }
//!     }
//!   },
//!   "providers": {
//!     "swapi": { "file": "providers/swapi.json" }
//!   }
//! }
//! ```
//!
//! Relative file paths are resolved against the directory holding the
//! document. Profiles keep the order they are declared in.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::Result;
use crate::error::LoadError;

/// Default file name of the document.
pub const SUPER_JSON_FILE: &str = "super.json";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProfileSettings {
    #[serde(default)]
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub version: Option<String>,
    /// Providers configured for this profile, keyed by provider name.
    #[serde(default)]
    pub providers: IndexMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SuperJson {
    #[serde(default)]
    pub profiles: IndexMap<String, ProfileSettings>,
    #[serde(default)]
    pub providers: IndexMap<String, ProviderSettings>,
    #[serde(skip)]
    base_dir: PathBuf,
}

impl SuperJson {
    /// Reads and parses the document at `path`.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| LoadError::io(path, e))?;

        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let super_json = Self::parse(&content, base_dir).map_err(|e| LoadError::parse(path, e))?;

        tracing::debug!(
            path = %path.display(),
            profiles = super_json.profiles.len(),
            providers = super_json.providers.len(),
            "Loaded super.json"
        );
        Ok(super_json)
    }

    pub fn parse(
        content: &str,
        base_dir: impl Into<PathBuf>,
    ) -> std::result::Result<Self, serde_json::Error> {
        let mut super_json: Self = serde_json::from_str(content)?;
        super_json.base_dir = base_dir.into();
        Ok(super_json)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolves a path from the document against its directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn profile(&self, profile_id: &str) -> Result<&ProfileSettings> {
        self.profiles
            .get(profile_id)
            .ok_or_else(|| LoadError::ProfileNotConfigured(profile_id.to_string()))
    }

    /// Names of the providers configured for a profile, in declaration order.
    pub fn profile_providers(&self, profile_id: &str) -> Result<Vec<&str>> {
        Ok(self
            .profile(profile_id)?
            .providers
            .keys()
            .map(String::as_str)
            .collect())
    }
}
