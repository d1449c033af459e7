//! CLI module for the Climate API
//!
//! Provides subcommands:
//! - `serve`: run the HTTP server
//! - `check`: bind the database schema and report table sizes

pub mod check;
pub mod serve;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::AppConfig;

/// Climate API - Read-only JSON endpoints over weather observations
#[derive(Parser)]
#[command(name = "climate-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve(ServeArgs),

    /// Verify the database schema and exit
    Check(DatabaseArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct DatabaseArgs {
    /// Path to the SQLite database, overriding configuration
    #[arg(long, short = 'd')]
    pub database: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    #[command(flatten)]
    pub db: DatabaseArgs,

    /// Port to listen on, overriding configuration
    #[arg(long, short = 'p')]
    pub port: Option<u16>,
}

impl DatabaseArgs {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(path) = &self.database {
            config.database.path = path.clone();
        }
    }
}

impl ServeArgs {
    pub fn apply(&self, config: &mut AppConfig) {
        self.db.apply(config);

        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

/// Load configuration from files, `.env` and `APP__*` variables
pub fn load_config() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    AppConfig::load().map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))
}
