//! Check command - binds the database schema and reports table sizes

use tracing::info;

use super::{load_config, DatabaseArgs};
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::storage::SqliteClimateRepository;

/// Exit with an error unless the configured database is usable
pub async fn run(args: DatabaseArgs) -> anyhow::Result<()> {
    let mut config = load_config()?;
    args.apply(&mut config);

    init_logging(&config.logging);

    let sqlite_config = config.database.to_sqlite_config();
    let repository = SqliteClimateRepository::connect(&sqlite_config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind climate database: {}", e))?;

    let counts = repository.table_counts().await?;

    info!(
        path = %sqlite_config.path.display(),
        measurements = counts.measurements,
        stations = counts.stations,
        "Climate database schema OK"
    );

    repository.pool().close().await;

    Ok(())
}
