use std::path::PathBuf;

use serde::Deserialize;

use crate::infrastructure::observability::ObservabilityConfig;
use crate::infrastructure::storage::SqliteConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Location and pool sizing of the climate database
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        let sqlite = SqliteConfig::default();

        Self {
            path: sqlite.path,
            max_connections: sqlite.max_connections,
            acquire_timeout_secs: sqlite.acquire_timeout_secs,
        }
    }
}

impl DatabaseConfig {
    pub fn to_sqlite_config(&self) -> SqliteConfig {
        SqliteConfig::new(&self.path)
            .with_max_connections(self.max_connections)
            .with_acquire_timeout(self.acquire_timeout_secs)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
