//! Storage infrastructure - SQLite climate store

mod sqlite;

#[cfg(test)]
pub use sqlite::test_support;
pub use sqlite::{
    SqliteClimateRepository, SqliteConfig, TableCounts, TableSchema, MEASUREMENT_TABLE,
    STATION_TABLE,
};
