use std::{
    net::{IpAddr, SocketAddr},
    num::NonZeroU32,
    path::Path,
};

use config::{Config, Environment, File};
use orchest_core::config::ConfigBuilder;
use serde::Deserialize;
use thiserror::Error;

const ENV_PREFIX: &str = "ORCHEST";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DATABASE_URL: &str = "sqlite://orchest.db?mode=rwc";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 8;

/// Validated settings. Read-only once loaded.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub listen_addr: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: NonZeroU32,
    pub log_statements: bool,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

impl ConfigBuilder for Settings {
    type Error = LoadError;

    /// The file at `path` is required; `ORCHEST__SECTION__KEY` environment
    /// variables override what it sets.
    fn build(path: &Path) -> Result<Self, Self::Error> {
        Settings::load(path, environment())
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

impl Settings {
    fn load(path: &Path, env: Environment) -> Result<Self, LoadError> {
        let raw: RawSettings = Config::builder()
            .add_source(File::from(path).required(true))
            .add_source(env)
            .build()?
            .try_deserialize()?;

        Settings::from_raw(raw)
    }

    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let host = raw.server.host.unwrap_or_else(|| DEFAULT_HOST.to_string());
        let ip: IpAddr = host
            .parse()
            .map_err(|_| LoadError::invalid("server.host", format!("`{host}` is not an IP address")))?;
        let port = raw.server.port.unwrap_or(DEFAULT_PORT);

        let url = raw
            .database
            .url
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        if url.trim().is_empty() {
            return Err(LoadError::invalid("database.url", "must not be empty"));
        }

        let max_connections = NonZeroU32::new(
            raw.database
                .max_connections
                .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS),
        )
        .ok_or_else(|| LoadError::invalid("database.max_connections", "must be greater than zero"))?;

        Ok(Settings {
            server: ServerSettings {
                listen_addr: SocketAddr::new(ip, port),
            },
            database: DatabaseSettings {
                url,
                max_connections,
                log_statements: raw.database.log_statements.unwrap_or(false),
            },
        })
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub(super) struct RawSettings {
    pub(super) server: RawServerSettings,
    pub(super) database: RawDatabaseSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub(super) struct RawServerSettings {
    pub(super) host: Option<String>,
    pub(super) port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub(super) struct RawDatabaseSettings {
    pub(super) url: Option<String>,
    pub(super) max_connections: Option<u32>,
    pub(super) log_statements: Option<bool>,
}

/// Loads `path` with `vars` standing in for the process environment.
#[cfg(test)]
pub(super) fn settings_with_env(path: &Path, vars: &[(&str, &str)]) -> Result<Settings, LoadError> {
    let vars = vars
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    Settings::load(path, environment().source(Some(vars)))
}

#[cfg(test)]
pub(super) fn settings_from_raw(raw: RawSettings) -> Result<Settings, LoadError> {
    Settings::from_raw(raw)
}
