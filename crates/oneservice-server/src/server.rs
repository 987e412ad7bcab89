use std::net::SocketAddr;

use async_graphql::dynamic::Schema;
use axum::{
    Router, middleware,
    routing::{get, post},
};
use oneservice_graphql::{DynExecutionEngine, GraphQLState, graphql_handler, graphql_handler_get};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{config::AppConfig, handlers, middleware as app_middleware, perform};

pub struct OneServiceServer {
    addr: SocketAddr,
    app: Router,
}

pub fn build_app(cfg: &AppConfig, schema: Schema, engine: DynExecutionEngine) -> Router {
    let body_limit = cfg.server.body_limit_bytes;

    let graphql = Router::new()
        .route("/graphql", get(graphql_handler_get).post(graphql_handler))
        .with_state(GraphQLState::new(schema).with_graphiql(cfg.graphql.graphiql));

    let rest = Router::new()
        .route("/perform", post(perform::perform_route))
        .with_state(engine);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(graphql)
        .merge(rest)
        // Outermost first: request id -> cors -> compression -> trace
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(app_middleware::request_id))
                .layer(CorsLayer::permissive())
                // Type-only adapter: Cors needs a `Default` response body
                .map_response(|res: axum::response::Response<_>| res.map(axum::body::Body::new))
                .layer(CompressionLayer::new())
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(|req: &axum::http::Request<_>| {
                            let req_id = req
                                .headers()
                                .get(oneservice_graphql::handler::REQUEST_ID_HEADER)
                                .and_then(|v| v.to_str().ok())
                                .unwrap_or("")
                                .to_string();
                            tracing::info_span!(
                                "http.request",
                                http.method = %req.method(),
                                http.target = %req.uri(),
                                http.status_code = tracing::field::Empty,
                                request_id = %req_id
                            )
                        })
                        .on_response(
                            |res: &axum::http::Response<_>,
                             latency: std::time::Duration,
                             span: &tracing::Span| {
                                span.record(
                                    "http.status_code",
                                    tracing::field::display(res.status().as_u16()),
                                );
                                tracing::info!(
                                    http.status = %res.status().as_u16(),
                                    elapsed_ms = %latency.as_millis(),
                                    "request handled"
                                );
                            },
                        ),
                ),
        )
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
    schema: Schema,
    engine: DynExecutionEngine,
}

impl ServerBuilder {
    pub fn new(schema: Schema, engine: DynExecutionEngine) -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
            schema,
            engine,
        }
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    pub fn build(self) -> OneServiceServer {
        let app = build_app(&self.config, self.schema, self.engine);

        OneServiceServer {
            addr: self.addr,
            app,
        }
    }
}

impl OneServiceServer {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
