//! SQLite climate store with connection pooling

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite};
use tracing::{debug, info};

use crate::domain::climate::{
    last_year_cutoff, parse_observation_date, ActiveStationTemperatures, ClimateRepository,
    DailyTemperatureSummary, DateRange, PrecipitationReading, Station, TemperatureObservation,
    DATE_FORMAT,
};
use crate::domain::DomainError;

/// SQLite storage configuration
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Path of the database file
    pub path: PathBuf,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Connection acquire timeout in seconds
    pub acquire_timeout_secs: u64,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("Resources/hawaii.sqlite"),
            max_connections: 5,
            acquire_timeout_secs: 30,
        }
    }
}

impl SqliteConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_acquire_timeout(mut self, secs: u64) -> Self {
        self.acquire_timeout_secs = secs;
        self
    }
}

/// Statically declared shape of a table the service reads
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

pub const MEASUREMENT_TABLE: TableSchema = TableSchema {
    name: "measurement",
    columns: &["station", "date", "prcp", "tobs"],
};

pub const STATION_TABLE: TableSchema = TableSchema {
    name: "station",
    columns: &["id", "station", "name"],
};

/// Row counts reported by `check`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableCounts {
    pub measurements: i64,
    pub stations: i64,
}

/// Climate repository over a read-only SQLite pool.
///
/// Every trait method acquires exactly one pooled connection and holds it for
/// all of its statements; the connection goes back to the pool when dropped.
#[derive(Debug, Clone)]
pub struct SqliteClimateRepository {
    pool: SqlitePool,
}

impl SqliteClimateRepository {
    /// Wraps an existing pool without checking the schema
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens the database read-only and binds both table schemas
    pub async fn connect(config: &SqliteConfig) -> Result<Self, DomainError> {
        if !config.path.is_file() {
            return Err(DomainError::schema(format!(
                "Database file '{}' does not exist",
                config.path.display()
            )));
        }

        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .read_only(true)
            .create_if_missing(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_with(options)
            .await
            .map_err(|e| {
                DomainError::schema(format!(
                    "Failed to open database '{}': {}",
                    config.path.display(),
                    e
                ))
            })?;

        let repository = Self::new(pool);
        repository.bind_schema().await?;

        info!(path = %config.path.display(), "Climate database bound");

        Ok(repository)
    }

    /// Returns a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Verifies that both tables exist with every required column
    pub async fn bind_schema(&self) -> Result<(), DomainError> {
        let mut conn = self.session().await?;

        for table in [MEASUREMENT_TABLE, STATION_TABLE] {
            check_table(&mut conn, &table).await?;
        }

        Ok(())
    }

    pub async fn table_counts(&self) -> Result<TableCounts, DomainError> {
        let mut conn = self.session().await?;

        let measurements: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM measurement")
            .fetch_one(&mut *conn)
            .await?;
        let stations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM station")
            .fetch_one(&mut *conn)
            .await?;

        Ok(TableCounts {
            measurements,
            stations,
        })
    }

    async fn session(&self) -> Result<PoolConnection<Sqlite>, DomainError> {
        self.pool
            .acquire()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to acquire connection: {}", e)))
    }
}

async fn check_table(
    conn: &mut PoolConnection<Sqlite>,
    table: &TableSchema,
) -> Result<(), DomainError> {
    let columns: Vec<String> = sqlx::query_scalar("SELECT name FROM pragma_table_info(?1)")
        .bind(table.name)
        .fetch_all(&mut **conn)
        .await
        .map_err(|e| {
            DomainError::schema(format!("Failed to inspect table '{}': {}", table.name, e))
        })?;

    if columns.is_empty() {
        return Err(DomainError::schema(format!(
            "Table '{}' is missing",
            table.name
        )));
    }

    let missing: Vec<&str> = table
        .columns
        .iter()
        .copied()
        .filter(|required| !columns.iter().any(|c| c.eq_ignore_ascii_case(required)))
        .collect();

    if !missing.is_empty() {
        return Err(DomainError::schema(format!(
            "Table '{}' is missing columns: {}",
            table.name,
            missing.join(", ")
        )));
    }

    debug!(table = table.name, columns = columns.len(), "Table schema bound");

    Ok(())
}

/// Last-year cutoff from the most recent date, `None` for an empty table
async fn fetch_cutoff(conn: &mut PoolConnection<Sqlite>) -> Result<Option<NaiveDate>, DomainError> {
    let latest: Option<String> = sqlx::query_scalar("SELECT MAX(date) FROM measurement")
        .fetch_one(&mut **conn)
        .await?;

    latest
        .as_deref()
        .map(parse_stored_date)
        .transpose()
        .map(|date| date.map(last_year_cutoff))
}

fn parse_stored_date(value: &str) -> Result<NaiveDate, DomainError> {
    parse_observation_date(value)
        .map_err(|e| DomainError::storage(format!("Malformed date in measurement table: {}", e)))
}

fn decode_date(row: &SqliteRow) -> Result<NaiveDate, DomainError> {
    let value: String = row.try_get("date")?;
    parse_stored_date(&value)
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn precipitation_from_row(row: &SqliteRow) -> Result<PrecipitationReading, DomainError> {
    Ok(PrecipitationReading {
        date: decode_date(row)?,
        prcp: row.try_get("prcp")?,
    })
}

fn station_from_row(row: &SqliteRow) -> Result<Station, DomainError> {
    Ok(Station {
        id: row.try_get("id")?,
        station: row.try_get("station")?,
        name: row.try_get("name")?,
    })
}

fn observation_from_row(row: &SqliteRow) -> Result<TemperatureObservation, DomainError> {
    Ok(TemperatureObservation {
        date: decode_date(row)?,
        tobs: row.try_get("tobs")?,
    })
}

fn summary_from_row(row: &SqliteRow) -> Result<DailyTemperatureSummary, DomainError> {
    Ok(DailyTemperatureSummary {
        date: decode_date(row)?,
        min: row.try_get("tmin")?,
        avg: row.try_get("tavg")?,
        max: row.try_get("tmax")?,
    })
}

#[async_trait]
impl ClimateRepository for SqliteClimateRepository {
    async fn precipitation_last_year(&self) -> Result<Vec<PrecipitationReading>, DomainError> {
        let mut conn = self.session().await?;

        let Some(cutoff) = fetch_cutoff(&mut conn).await? else {
            return Ok(Vec::new());
        };

        let rows = sqlx::query(
            "SELECT date, CAST(prcp AS REAL) AS prcp FROM measurement WHERE date >= ?1",
        )
        .bind(format_date(cutoff))
        .fetch_all(&mut *conn)
        .await?;

        rows.iter().map(precipitation_from_row).collect()
    }

    async fn stations(&self) -> Result<Vec<Station>, DomainError> {
        let mut conn = self.session().await?;

        let rows = sqlx::query("SELECT id, station, name FROM station")
            .fetch_all(&mut *conn)
            .await?;

        rows.iter().map(station_from_row).collect()
    }

    async fn most_active_station_temperatures(
        &self,
    ) -> Result<ActiveStationTemperatures, DomainError> {
        let mut conn = self.session().await?;

        let Some(cutoff) = fetch_cutoff(&mut conn).await? else {
            return Ok(ActiveStationTemperatures::default());
        };

        let station: Option<String> = sqlx::query_scalar(
            "SELECT station FROM measurement \
             GROUP BY station \
             ORDER BY COUNT(station) DESC, station ASC \
             LIMIT 1",
        )
        .fetch_optional(&mut *conn)
        .await?;

        let Some(station) = station else {
            return Ok(ActiveStationTemperatures::default());
        };

        let rows = sqlx::query(
            "SELECT date, CAST(tobs AS REAL) AS tobs FROM measurement \
             WHERE station = ?1 AND date >= ?2 AND tobs IS NOT NULL",
        )
        .bind(&station)
        .bind(format_date(cutoff))
        .fetch_all(&mut *conn)
        .await?;

        let observations = rows
            .iter()
            .map(observation_from_row)
            .collect::<Result<Vec<_>, DomainError>>()?;

        Ok(ActiveStationTemperatures {
            station: Some(station),
            observations,
        })
    }

    async fn daily_temperature_summaries(
        &self,
        range: DateRange,
    ) -> Result<Vec<DailyTemperatureSummary>, DomainError> {
        let mut conn = self.session().await?;

        let rows = sqlx::query(
            "SELECT date, \
                    CAST(MIN(tobs) AS REAL) AS tmin, \
                    CAST(AVG(tobs) AS REAL) AS tavg, \
                    CAST(MAX(tobs) AS REAL) AS tmax \
             FROM measurement \
             WHERE date >= ?1 AND (?2 IS NULL OR date <= ?2) AND tobs IS NOT NULL \
             GROUP BY date \
             ORDER BY date",
        )
        .bind(format_date(range.start()))
        .bind(range.end().map(format_date))
        .fetch_all(&mut *conn)
        .await?;

        rows.iter().map(summary_from_row).collect()
    }

    async fn ping(&self) -> Result<(), DomainError> {
        let mut conn = self.session().await?;

        sqlx::query("SELECT 1").execute(&mut *conn).await?;

        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::domain::climate::Measurement;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn measurement(station: &str, day: &str, prcp: Option<f64>, tobs: f64) -> Measurement {
        Measurement::new(station, date(day), prcp, tobs)
    }

    #[test]
    fn test_sqlite_config_builder() {
        let config = SqliteConfig::new("/data/hawaii.sqlite")
            .with_max_connections(2)
            .with_acquire_timeout(5);

        assert_eq!(config.path, PathBuf::from("/data/hawaii.sqlite"));
        assert_eq!(config.max_connections, 2);
        assert_eq!(config.acquire_timeout_secs, 5);
    }

    #[tokio::test]
    async fn test_bind_schema_accepts_expected_tables() {
        let repo = seeded_repository(&[], &[]).await;
        assert!(repo.bind_schema().await.is_ok());
    }

    #[tokio::test]
    async fn test_bind_schema_rejects_missing_table() {
        let pool = memory_pool().await;
        sqlx::query(CREATE_MEASUREMENT).execute(&pool).await.unwrap();

        let err = SqliteClimateRepository::new(pool).bind_schema().await.unwrap_err();

        assert!(matches!(err, DomainError::Schema { .. }));
        assert!(err.to_string().contains("'station' is missing"));
    }

    #[tokio::test]
    async fn test_bind_schema_rejects_missing_column() {
        let pool = memory_pool().await;
        sqlx::query("CREATE TABLE measurement (station TEXT, date TEXT, prcp FLOAT)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query(CREATE_STATION).execute(&pool).await.unwrap();

        let err = SqliteClimateRepository::new(pool).bind_schema().await.unwrap_err();

        assert!(err.to_string().contains("missing columns: tobs"));
    }

    #[tokio::test]
    async fn test_connect_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = SqliteConfig::new(dir.path().join("absent.sqlite"));

        let err = SqliteClimateRepository::connect(&config).await.unwrap_err();

        assert!(matches!(err, DomainError::Schema { .. }));
        assert!(!dir.path().join("absent.sqlite").exists());
    }

    #[tokio::test]
    async fn test_connect_opens_file_read_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hawaii.sqlite");

        let writable = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(SqliteConnectOptions::new().filename(&path).create_if_missing(true))
            .await
            .unwrap();
        create_tables(&writable).await;
        insert_stations(&writable, &[Station::new(1, "USC00519397", "WAIKIKI 717.2, HI US")]).await;
        writable.close().await;

        let repo = SqliteClimateRepository::connect(&SqliteConfig::new(&path))
            .await
            .unwrap();

        assert_eq!(repo.stations().await.unwrap().len(), 1);

        let write = sqlx::query("DELETE FROM station").execute(repo.pool()).await;
        assert!(write.is_err());
    }

    #[tokio::test]
    async fn test_precipitation_respects_calendar_cutoff() {
        let repo = seeded_repository(
            &[
                measurement("A", "2016-02-09", Some(1.0), 60.0),
                measurement("A", "2016-02-10", Some(2.0), 61.0),
                measurement("B", "2016-02-10", None, 62.0),
                measurement("A", "2017-02-10", Some(0.0), 63.0),
            ],
            &[],
        )
        .await;

        let readings = repo.precipitation_last_year().await.unwrap();

        assert_eq!(readings.len(), 3);
        assert!(readings.iter().all(|r| r.date >= date("2016-02-10")));
        assert!(readings.iter().any(|r| r.prcp.is_none()));
    }

    #[tokio::test]
    async fn test_precipitation_on_empty_table() {
        let repo = seeded_repository(&[], &[]).await;
        assert!(repo.precipitation_last_year().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stations_returns_every_row() {
        let stations = vec![
            Station::new(1, "USC00519397", "WAIKIKI 717.2, HI US"),
            Station::new(2, "USC00513117", "KANEOHE 838.1, HI US"),
            Station::new(3, "USC00514830", "KUALOA RANCH HEADQUARTERS 886.9, HI US"),
        ];
        let repo = seeded_repository(&[], &stations).await;

        assert_eq!(repo.stations().await.unwrap(), stations);
    }

    #[tokio::test]
    async fn test_most_active_station_selects_highest_count() {
        let mut rows = Vec::new();
        for day in 1..=10 {
            rows.push(measurement("A", &format!("2017-01-{day:02}"), None, 60.0));
        }
        for day in 1..=20 {
            rows.push(measurement("B", &format!("2017-02-{day:02}"), None, 70.0));
        }
        let repo = seeded_repository(&rows, &[]).await;

        let result = repo.most_active_station_temperatures().await.unwrap();

        assert_eq!(result.station.as_deref(), Some("B"));
        assert_eq!(result.observations.len(), 20);
    }

    #[tokio::test]
    async fn test_most_active_station_tie_break() {
        let repo = seeded_repository(
            &[
                measurement("USC2", "2017-01-01", None, 61.0),
                measurement("USC1", "2017-01-01", None, 62.0),
                measurement("USC2", "2017-01-02", None, 63.0),
                measurement("USC1", "2017-01-02", None, 64.0),
            ],
            &[],
        )
        .await;

        let result = repo.most_active_station_temperatures().await.unwrap();

        assert_eq!(result.station.as_deref(), Some("USC1"));
        assert_eq!(result.observations.len(), 2);
    }

    #[tokio::test]
    async fn test_most_active_station_filters_to_last_year() {
        let repo = seeded_repository(
            &[
                measurement("A", "2015-01-01", None, 50.0),
                measurement("A", "2015-01-02", None, 51.0),
                measurement("A", "2016-06-01", None, 72.0),
                measurement("B", "2017-01-01", None, 60.0),
            ],
            &[],
        )
        .await;

        let result = repo.most_active_station_temperatures().await.unwrap();

        assert_eq!(result.station.as_deref(), Some("A"));
        assert_eq!(
            result.observations,
            vec![TemperatureObservation {
                date: date("2016-06-01"),
                tobs: 72.0,
            }]
        );
    }

    #[tokio::test]
    async fn test_daily_summary_single_day() {
        let repo = seeded_repository(
            &[
                measurement("A", "2016-06-01", None, 70.0),
                measurement("B", "2016-06-01", None, 80.0),
                measurement("A", "2016-06-02", None, 90.0),
            ],
            &[],
        )
        .await;

        let day = date("2016-06-01");
        let summaries = repo
            .daily_temperature_summaries(DateRange::between(day, day))
            .await
            .unwrap();

        assert_eq!(
            summaries,
            vec![DailyTemperatureSummary {
                date: day,
                min: 70.0,
                avg: 75.0,
                max: 80.0,
            }]
        );
    }

    #[tokio::test]
    async fn test_daily_summary_open_ended_is_ordered() {
        let repo = seeded_repository(
            &[
                measurement("A", "2016-06-03", None, 70.0),
                measurement("A", "2016-06-01", None, 71.0),
                measurement("A", "2016-05-31", None, 72.0),
                measurement("A", "2016-06-02", None, 73.0),
            ],
            &[],
        )
        .await;

        let summaries = repo
            .daily_temperature_summaries(DateRange::since(date("2016-06-01")))
            .await
            .unwrap();

        let dates: Vec<NaiveDate> = summaries.iter().map(|s| s.date).collect();
        assert_eq!(
            dates,
            vec![date("2016-06-01"), date("2016-06-02"), date("2016-06-03")]
        );
    }

    #[tokio::test]
    async fn test_daily_summary_reversed_range_is_empty() {
        let repo = seeded_repository(&[measurement("A", "2016-06-02", None, 70.0)], &[]).await;

        let summaries = repo
            .daily_temperature_summaries(DateRange::between(date("2016-06-03"), date("2016-06-01")))
            .await
            .unwrap();

        assert!(summaries.is_empty());
    }

    #[tokio::test]
    async fn test_table_counts_and_ping() {
        let repo = seeded_repository(
            &[measurement("A", "2016-06-02", None, 70.0)],
            &[Station::new(1, "A", "Station A")],
        )
        .await;

        assert!(repo.ping().await.is_ok());
        assert_eq!(
            repo.table_counts().await.unwrap(),
            TableCounts {
                measurements: 1,
                stations: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_failed_query_releases_connection() {
        let repo = seeded_repository(&[measurement("A", "2016-06-01", None, 70.0)], &[]).await;
        repo.bind_schema().await.unwrap();

        sqlx::query("DROP TABLE station").execute(repo.pool()).await.unwrap();

        assert!(repo.stations().await.is_err());
        assert!(repo.ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_malformed_stored_date_releases_connection() {
        let repo = seeded_repository(&[], &[]).await;
        sqlx::query("INSERT INTO measurement (station, date, prcp, tobs) VALUES ('A', '06/01/2016', 0.1, 70.0)")
            .execute(repo.pool())
            .await
            .unwrap();

        let err = repo.precipitation_last_year().await.unwrap_err();

        assert!(matches!(err, DomainError::Storage { .. }));
        assert!(repo.ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_null_temperatures_are_skipped() {
        let repo = seeded_repository(&[measurement("A", "2016-06-01", None, 70.0)], &[]).await;
        sqlx::query("INSERT INTO measurement (station, date, prcp, tobs) VALUES ('A', '2016-06-01', NULL, NULL)")
            .execute(repo.pool())
            .await
            .unwrap();
        sqlx::query("INSERT INTO measurement (station, date, prcp, tobs) VALUES ('A', '2016-06-02', NULL, NULL)")
            .execute(repo.pool())
            .await
            .unwrap();

        let tobs = repo.most_active_station_temperatures().await.unwrap();
        let temps: Vec<f64> = tobs.observations.iter().map(|o| o.tobs).collect();
        assert_eq!(temps, vec![70.0]);

        let summaries = repo
            .daily_temperature_summaries(DateRange::since(date("2016-06-01")))
            .await
            .unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].date, date("2016-06-01"));
        assert_eq!(summaries[0].min, 70.0);
        assert_eq!(summaries[0].max, 70.0);
    }
}
