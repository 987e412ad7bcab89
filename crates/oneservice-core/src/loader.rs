//! Profile and provider loaders.
//!
//! The schema builder only sees these traits. The file-system
//! implementations read the documents referenced by `super.json`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::Result;
use crate::error::LoadError;
use crate::profile::LoadedProfile;
use crate::provider::ProviderDescriptor;
use crate::super_json::SuperJson;

/// Loads the parsed form of a configured profile.
///
/// Must be deterministic: identical ids yield identical profiles.
#[async_trait]
pub trait ProfileLoader: Send + Sync {
    async fn load(&self, profile_id: &str) -> Result<LoadedProfile>;
}

/// Resolves a provider name into its descriptor.
#[async_trait]
pub trait ProviderLoader: Send + Sync {
    async fn load(&self, provider_name: &str) -> Result<ProviderDescriptor>;
}

pub type DynProfileLoader = Arc<dyn ProfileLoader>;
pub type DynProviderLoader = Arc<dyn ProviderLoader>;

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| LoadError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| LoadError::parse(path, e))
}

/// Loads profiles from the `file` entries of `super.json`.
#[derive(Debug, Clone)]
pub struct FileProfileLoader {
    super_json: Arc<SuperJson>,
}

impl FileProfileLoader {
    pub fn new(super_json: Arc<SuperJson>) -> Self {
        Self { super_json }
    }
}

#[async_trait]
impl ProfileLoader for FileProfileLoader {
    async fn load(&self, profile_id: &str) -> Result<LoadedProfile> {
        let settings = self.super_json.profile(profile_id)?;
        let file = settings
            .file
            .as_deref()
            .ok_or_else(|| LoadError::ProfileFileMissing(profile_id.to_string()))?;
        let path = self.super_json.resolve_path(file);

        debug!(profile = %profile_id, path = %path.display(), "Loading profile");
        read_json(&path).await
    }
}

/// Loads provider descriptors from the `file` entries of `super.json`.
#[derive(Debug, Clone)]
pub struct FileProviderLoader {
    super_json: Arc<SuperJson>,
}

impl FileProviderLoader {
    pub fn new(super_json: Arc<SuperJson>) -> Self {
        Self { super_json }
    }
}

#[async_trait]
impl ProviderLoader for FileProviderLoader {
    async fn load(&self, provider_name: &str) -> Result<ProviderDescriptor> {
        let file = self
            .super_json
            .providers
            .get(provider_name)
            .and_then(|settings| settings.file.as_deref())
            .ok_or_else(|| LoadError::ProviderNotResolved(provider_name.to_string()))?;
        let path = self.super_json.resolve_path(file);

        debug!(provider = %provider_name, path = %path.display(), "Loading provider");
        let descriptor: ProviderDescriptor = read_json(&path).await?;

        if descriptor.name != provider_name {
            return Err(LoadError::ProviderNameMismatch {
                expected: provider_name.to_string(),
                found: descriptor.name,
            });
        }

        Ok(descriptor)
    }
}

/// Profiles held in memory, keyed by profile id.
///
/// Used when profiles are compiled ahead of time or embedded in the binary.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileLoader {
    profiles: HashMap<String, LoadedProfile>,
}

impl InMemoryProfileLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a profile under the id of its header.
    #[must_use]
    pub fn with_profile(mut self, profile: LoadedProfile) -> Self {
        self.profiles.insert(profile.id().to_string(), profile);
        self
    }
}

#[async_trait]
impl ProfileLoader for InMemoryProfileLoader {
    async fn load(&self, profile_id: &str) -> Result<LoadedProfile> {
        self.profiles
            .get(profile_id)
            .cloned()
            .ok_or_else(|| LoadError::ProfileNotConfigured(profile_id.to_string()))
    }
}

/// Provider descriptors held in memory, keyed by provider name.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProviderLoader {
    providers: HashMap<String, ProviderDescriptor>,
}

impl InMemoryProviderLoader {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_provider(mut self, provider: ProviderDescriptor) -> Self {
        self.providers.insert(provider.name.clone(), provider);
        self
    }
}

#[async_trait]
impl ProviderLoader for InMemoryProviderLoader {
    async fn load(&self, provider_name: &str) -> Result<ProviderDescriptor> {
        self.providers
            .get(provider_name)
            .cloned()
            .ok_or_else(|| LoadError::ProviderNotResolved(provider_name.to_string()))
    }
}
