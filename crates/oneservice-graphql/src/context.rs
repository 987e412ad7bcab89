//! GraphQL execution context.
//!
//! The context is constructed per request and passed through the
//! async-graphql data system. It can override the execution engine the
//! schema was built with (per-request credentials, multi-tenant setups) and
//! carries the tracing span resolver logs are attached to.
//!
//! # Example
//!
//! ```ignore
//! use oneservice_graphql::GraphQLContextBuilder;
//!
//! let context = GraphQLContextBuilder::new()
//!     .with_request_id("req-123")
//!     .with_engine(tenant_engine.clone())
//!     .build()?;
//! ```

use tracing::Span;

use crate::engine::DynExecutionEngine;

#[derive(Clone)]
pub struct GraphQLContext {
    /// Request ID for tracing and correlation.
    pub request_id: String,

    /// Engine used instead of the schema's default one.
    pub engine: Option<DynExecutionEngine>,

    /// Parent span for resolver logs.
    pub span: Span,
}

impl GraphQLContext {
    #[must_use]
    pub fn builder() -> GraphQLContextBuilder {
        GraphQLContextBuilder::default()
    }
}

impl std::fmt::Debug for GraphQLContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphQLContext")
            .field("request_id", &self.request_id)
            .field("engine_override", &self.engine.is_some())
            .finish()
    }
}

/// Builder for constructing GraphQLContext.
#[derive(Default)]
pub struct GraphQLContextBuilder {
    request_id: Option<String>,
    engine: Option<DynExecutionEngine>,
    span: Option<Span>,
}

impl GraphQLContextBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// Overrides the execution engine for this request.
    #[must_use]
    pub fn with_engine(mut self, engine: DynExecutionEngine) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Sets the span resolver logs are recorded under.
    /// Defaults to the span current at build time.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Builds the GraphQLContext.
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are missing.
    pub fn build(self) -> Result<GraphQLContext, ContextBuilderError> {
        let request_id = self
            .request_id
            .ok_or(ContextBuilderError::MissingField("request_id"))?;

        Ok(GraphQLContext {
            request_id,
            engine: self.engine,
            span: self.span.unwrap_or_else(Span::current),
        })
    }
}

/// Errors that can occur when building a GraphQLContext.
#[derive(Debug, thiserror::Error)]
pub enum ContextBuilderError {
    /// A required field was not provided.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}
