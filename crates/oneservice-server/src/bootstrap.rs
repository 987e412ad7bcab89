//! Compiles the configured profiles into the GraphQL schema at startup.

use std::sync::Arc;

use anyhow::Context;
use async_graphql::dynamic::Schema;
use oneservice_core::{FileProfileLoader, FileProviderLoader, SuperJson};
use oneservice_graphql::{DynExecutionEngine, ProfileSchemaBuilder};
use tracing::info;

use crate::config::AppConfig;

/// Loads `super.json` and builds the schema of every profile it lists.
pub async fn build_schema(cfg: &AppConfig, engine: DynExecutionEngine) -> anyhow::Result<Schema> {
    let path = &cfg.profiles.super_json;
    let super_json = Arc::new(SuperJson::load(path).await?);

    info!(
        path = %path.display(),
        profiles = super_json.profiles.len(),
        providers = super_json.providers.len(),
        "Profiles configuration loaded"
    );

    let schema = ProfileSchemaBuilder::new(
        Arc::new(FileProfileLoader::new(super_json.clone())),
        Arc::new(FileProviderLoader::new(super_json.clone())),
        engine,
        cfg.graphql.to_schema_builder_config(),
    )
    .with_super_json(&super_json)
    .build()
    .await
    .context("failed to build GraphQL schema")?;

    Ok(schema)
}
