//! Climate API
//!
//! Read-only JSON endpoints over a weather observation dataset:
//! - Last year of precipitation
//! - Station listing
//! - Temperatures of the most active station
//! - Per-day temperature summaries over a date range

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::services::ClimateService;
use infrastructure::storage::SqliteClimateRepository;
use tracing::info;

/// Bind the climate database and build the shared application state.
///
/// Fails when the database file is missing or either table lacks a required column.
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let sqlite_config = config.database.to_sqlite_config();

    info!(path = %sqlite_config.path.display(), "Opening climate database");

    let repository = SqliteClimateRepository::connect(&sqlite_config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind climate database: {}", e))?;

    Ok(AppState::new(ClimateService::new(Arc::new(repository))))
}
