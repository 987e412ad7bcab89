//! # oneservice-graphql
//!
//! GraphQL API layer for OneService.
//!
//! This crate compiles profiles into a GraphQL schema and resolves use-case
//! fields by handing them to an execution engine:
//!
//! - Safe use cases become query fields, all others mutation fields
//! - Input and result structures become GraphQL input and output types
//! - Providers configured for a profile become a `provider` argument
//! - Engine failures surface as field errors with machine-readable extensions
//!
//! ## Overview
//!
//! The schema is generated with async-graphql's dynamic schema API from the
//! profiles listed in `super.json`. It is built once at startup; a profile
//! that cannot be compiled aborts the build.
//!
//! ## Endpoints
//!
//! - `POST /graphql` - GraphQL endpoint
//! - `GET /graphql` - GraphiQL, or a query via URL params
//!
//! ## Configuration
//!
//! Add to `oneservice.toml`:
//!
//! ```toml
//! [graphql]
//! graphiql = true
//! max_depth = 15
//! max_complexity = 500
//! introspection = true
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Configuration options
//! - [`naming`] - GraphQL name derivation
//! - [`schema`] - Schema compilation
//! - [`resolvers`] - Use-case resolvers and value shaping
//! - [`engine`] - Execution engine interface
//! - [`context`] - GraphQL execution context
//! - [`handler`] - Axum HTTP handlers
//! - [`error`] - Error types

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod handler;
pub mod naming;
pub mod resolvers;
pub mod schema;

// Re-export main types
pub use config::GraphQLConfig;
pub use context::{ContextBuilderError, GraphQLContext, GraphQLContextBuilder};
pub use engine::{DynExecutionEngine, EngineError, ExecutionEngine, PerformError, PerformRequest};
pub use error::{GraphQLError, MultipleActiveProvidersError, SchemaBuildError};
pub use handler::{GraphQLState, graphql_handler, graphql_handler_get};
pub use schema::{ProfileSchemaBuilder, SchemaBuilderConfig};

/// Result type for GraphQL operations.
pub type Result<T> = std::result::Result<T, GraphQLError>;
