//! GraphQL configuration.
//!
//! Specified in `oneservice.toml` under the `[graphql]` section.
//!
//! # Example Configuration
//!
//! ```toml
//! [graphql]
//! graphiql = true
//! max_depth = 15
//! max_complexity = 500
//! introspection = true
//! ```

use serde::{Deserialize, Serialize};

/// GraphQL API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQLConfig {
    /// Serve the GraphiQL IDE on `GET /graphql`.
    /// Default: false
    #[serde(default)]
    pub graphiql: bool,

    /// Maximum query depth allowed.
    /// Default: 15
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum query complexity allowed.
    /// Default: 500
    #[serde(default = "default_max_complexity")]
    pub max_complexity: usize,

    /// Enable GraphQL introspection queries.
    /// Default: true
    #[serde(default = "default_introspection")]
    pub introspection: bool,
}

fn default_max_depth() -> usize {
    15
}

fn default_max_complexity() -> usize {
    500
}

fn default_introspection() -> bool {
    true
}

impl Default for GraphQLConfig {
    fn default() -> Self {
        Self {
            graphiql: false,
            max_depth: default_max_depth(),
            max_complexity: default_max_complexity(),
            introspection: default_introspection(),
        }
    }
}

impl GraphQLConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration values are invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_depth == 0 {
            return Err("graphql.max_depth must be > 0".into());
        }
        if self.max_complexity == 0 {
            return Err("graphql.max_complexity must be > 0".into());
        }
        if self.graphiql && !self.introspection {
            return Err("graphql.graphiql requires graphql.introspection".into());
        }
        Ok(())
    }

    #[must_use]
    pub fn to_schema_builder_config(&self) -> crate::SchemaBuilderConfig {
        crate::SchemaBuilderConfig {
            max_depth: self.max_depth,
            max_complexity: self.max_complexity,
            introspection_enabled: self.introspection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GraphQLConfig::default();
        assert!(!config.graphiql);
        assert_eq!(config.max_depth, 15);
        assert_eq!(config.max_complexity, 500);
        assert!(config.introspection);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_limits() {
        let mut config = GraphQLConfig::default();
        config.max_depth = 0;
        assert!(config.validate().is_err());

        let mut config = GraphQLConfig::default();
        config.max_complexity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_graphiql_needs_introspection() {
        let config = GraphQLConfig {
            graphiql: true,
            introspection: false,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_from_toml() {
        let toml = r#"
            graphiql = true
            max_depth = 20
            introspection = false
        "#;

        let config: GraphQLConfig = toml::from_str(toml).unwrap();
        assert!(config.graphiql);
        assert_eq!(config.max_depth, 20);
        assert_eq!(config.max_complexity, 500);
        assert!(!config.introspection);

        let builder = config.to_schema_builder_config();
        assert!(!builder.introspection_enabled);
        assert_eq!(builder.max_depth, 20);
    }
}
