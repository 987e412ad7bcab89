pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod perform;
pub mod remote_engine;
pub mod server;

pub use bootstrap::build_schema;
pub use cli::Cli;
pub use config::{AppConfig, EngineConfig, LoggingConfig, ProfilesConfig, ServerConfig};
pub use observability::{apply_logging_level, init_tracing};
pub use remote_engine::RemoteEngine;
pub use server::{OneServiceServer, ServerBuilder, build_app};
