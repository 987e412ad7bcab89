use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use oneservice_core::SUPER_JSON_FILE;
use oneservice_graphql::GraphQLConfig;
use serde::{Deserialize, Serialize};

/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "oneservice.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub graphql: GraphQLConfig,
    /// Where the configured profiles are read from
    #[serde(default)]
    pub profiles: ProfilesConfig,
    /// Execution engine the resolvers delegate to
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        if self.server.body_limit_bytes == 0 {
            return Err("server.body_limit_bytes must be > 0".into());
        }
        self.graphql
            .validate()
            .map_err(|e| format!("graphql config error: {e}"))?;
        if self.profiles.super_json.as_os_str().is_empty() {
            return Err("profiles.super_json must not be empty".into());
        }
        match url::Url::parse(&self.engine.url) {
            Ok(u) if matches!(u.scheme(), "http" | "https") => {}
            Ok(u) => {
                return Err(format!(
                    "engine.url must use http or https, got '{}'",
                    u.scheme()
                ));
            }
            Err(e) => return Err(format!("engine.url is invalid: {e}")),
        }
        if self.engine.timeout_ms == 0 {
            return Err("engine.timeout_ms must be > 0".into());
        }
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        use std::net::{IpAddr, Ipv4Addr};
        let host: IpAddr = match self.server.host.as_str() {
            "localhost" => IpAddr::V4(Ipv4Addr::LOCALHOST),
            other => other
                .parse()
                .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0))),
        };
        SocketAddr::from((host, self.server.port))
    }

    pub fn engine_timeout(&self) -> Duration {
        Duration::from_millis(self.engine.timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_host() -> String {
    "localhost".into()
}
fn default_port() -> u16 {
    8000
}
fn default_body_limit() -> usize {
    1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilesConfig {
    /// Path to `super.json`
    #[serde(default = "default_super_json")]
    pub super_json: PathBuf,
}

fn default_super_json() -> PathBuf {
    PathBuf::from(SUPER_JSON_FILE)
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        Self {
            super_json: default_super_json(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Endpoint accepting perform requests
    #[serde(default = "default_engine_url")]
    pub url: String,
    #[serde(default = "default_engine_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_engine_url() -> String {
    "http://127.0.0.1:8001/perform".into()
}
fn default_engine_timeout_ms() -> u64 {
    30_000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            url: default_engine_url(),
            timeout_ms: default_engine_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

pub mod loader {
    use super::{AppConfig, DEFAULT_CONFIG_FILE};
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        let pathbuf = PathBuf::from(path.unwrap_or(DEFAULT_CONFIG_FILE));
        if pathbuf.exists() {
            builder = builder.add_source(File::from(pathbuf));
        }
        // Environment variable overrides, e.g., ONESERVICE__SERVER__PORT=9090
        builder = builder.add_source(
            Environment::with_prefix("ONESERVICE")
                .prefix_separator("__")
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = AppConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.profiles.super_json, PathBuf::from("super.json"));
        assert_eq!(cfg.addr(), "127.0.0.1:8000".parse::<SocketAddr>().unwrap());
        assert_eq!(cfg.engine_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_values() {
        let mut cfg = AppConfig::default();
        cfg.server.port = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = AppConfig::default();
        cfg.engine.url = "ftp://engine".into();
        assert!(cfg.validate().unwrap_err().contains("http or https"));

        let mut cfg = AppConfig::default();
        cfg.engine.url = "not a url".into();
        assert!(cfg.validate().unwrap_err().contains("engine.url is invalid"));

        let mut cfg = AppConfig::default();
        cfg.logging.level = "loud".into();
        assert!(cfg.validate().is_err());

        let mut cfg = AppConfig::default();
        cfg.graphql.max_depth = 0;
        assert!(cfg.validate().unwrap_err().starts_with("graphql config error"));
    }

    #[test]
    fn test_addr_falls_back_to_unspecified() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "not-an-ip".into();
        cfg.server.port = 9000;
        assert_eq!(cfg.addr(), "0.0.0.0:9000".parse::<SocketAddr>().unwrap());
    }
}
