use std::{env, sync::Arc};

use clap::Parser;
use oneservice_graphql::DynExecutionEngine;
use oneservice_server::config::{DEFAULT_CONFIG_FILE, loader::load_config};
use oneservice_server::{Cli, RemoteEngine, ServerBuilder, apply_logging_level, build_schema};

/// How the configuration path was determined.
#[derive(Debug, Clone, Copy)]
enum ConfigSource {
    /// From --config CLI argument
    CliArgument,
    /// From ONESERVICE_CONFIG environment variable
    EnvironmentVariable,
    /// Default path (oneservice.toml)
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CliArgument => write!(f, "CLI argument (--config)"),
            Self::EnvironmentVariable => write!(f, "environment variable (ONESERVICE_CONFIG)"),
            Self::Default => write!(f, "default"),
        }
    }
}

#[tokio::main]
async fn main() {
    // Load .env file if present (before anything else)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist - it's optional
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    oneservice_server::observability::init_tracing();

    let cli = Cli::parse();
    let (config_path, source) = resolve_config_path(&cli);

    let mut cfg = match load_config(Some(&config_path)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };
    cli.apply_overrides(&mut cfg);
    if let Err(e) = cfg.validate() {
        eprintln!("Configuration error: {e}");
        std::process::exit(2);
    }

    tracing::info!(
        path = %config_path,
        source = %source,
        "Configuration loaded"
    );
    apply_logging_level(&cfg.logging.level);

    let engine: DynExecutionEngine = match RemoteEngine::from_config(&cfg.engine) {
        Ok(engine) => Arc::new(engine),
        Err(e) => {
            eprintln!("Execution engine error: {e}");
            std::process::exit(2);
        }
    };

    let schema = match build_schema(&cfg, engine.clone()).await {
        Ok(schema) => schema,
        Err(e) => {
            eprintln!("Schema error: {e:#}");
            std::process::exit(2);
        }
    };

    if cli.print_schema {
        println!("{}", schema.sdl());
        return;
    }

    tracing::info!(
        engine = %cfg.engine.url,
        graphiql = cfg.graphql.graphiql,
        "Starting OneService"
    );

    let server = ServerBuilder::new(schema, engine).with_config(cfg).build();
    if let Err(e) = server.run().await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

fn resolve_config_path(cli: &Cli) -> (String, ConfigSource) {
    // 1. Check CLI: --config <path>
    if let Some(path) = &cli.config {
        return (path.clone(), ConfigSource::CliArgument);
    }

    // 2. Check environment variable
    if let Ok(path) = env::var("ONESERVICE_CONFIG")
        && !path.is_empty()
    {
        return (path, ConfigSource::EnvironmentVariable);
    }

    // 3. Default to oneservice.toml
    (DEFAULT_CONFIG_FILE.to_string(), ConfigSource::Default)
}
