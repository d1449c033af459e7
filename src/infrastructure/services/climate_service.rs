//! Climate service - validated, instrumented reads over the climate store

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error};

use crate::domain::{
    parse_observation_date, ActiveStationTemperatures, ClimateRepository,
    DailyTemperatureSummary, DateRange, DomainError, PrecipitationReading, Station,
};
use crate::infrastructure::observability::record_store_query;

/// Climate service shared by every request handler
#[derive(Debug, Clone)]
pub struct ClimateService {
    repository: Arc<dyn ClimateRepository>,
}

impl ClimateService {
    /// Create a new ClimateService over the given repository
    pub fn new(repository: Arc<dyn ClimateRepository>) -> Self {
        Self { repository }
    }

    /// Precipitation readings for the last year of data
    pub async fn precipitation(&self) -> Result<Vec<PrecipitationReading>, DomainError> {
        self.instrumented("precipitation", self.repository.precipitation_last_year())
            .await
    }

    /// All stations
    pub async fn stations(&self) -> Result<Vec<Station>, DomainError> {
        self.instrumented("stations", self.repository.stations()).await
    }

    /// Last year of temperatures for the most active station
    pub async fn most_active_station_temperatures(
        &self,
    ) -> Result<ActiveStationTemperatures, DomainError> {
        let result = self
            .instrumented("tobs", self.repository.most_active_station_temperatures())
            .await?;

        debug!(
            station = result.station.as_deref().unwrap_or("<none>"),
            observations = result.observations.len(),
            "Selected most active station"
        );

        Ok(result)
    }

    /// Per-date temperature summaries from `start`, optionally up to `end`.
    ///
    /// Both bounds must be `YYYY-MM-DD`; a reversed range yields no rows.
    pub async fn temperature_summary(
        &self,
        start: &str,
        end: Option<&str>,
    ) -> Result<Vec<DailyTemperatureSummary>, DomainError> {
        let range = parse_range(start, end)?;

        if range.is_empty() {
            debug!(start, end, "Reversed date range, skipping store query");
            return Ok(Vec::new());
        }

        self.instrumented(
            "temperature_summary",
            self.repository.daily_temperature_summaries(range),
        )
        .await
    }

    /// Check that the store answers queries
    pub async fn ping(&self) -> Result<(), DomainError> {
        self.repository.ping().await
    }

    async fn instrumented<T, F>(&self, operation: &'static str, query: F) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        let start = Instant::now();
        let result = query.await;

        record_store_query(operation, result.is_ok(), start.elapsed());

        if let Err(e) = &result {
            error!(operation, error = %e, "Climate store query failed");
        }

        result
    }
}

fn parse_range(start: &str, end: Option<&str>) -> Result<DateRange, DomainError> {
    let start_date = parse_observation_date(start)
        .map_err(|e| DomainError::invalid_param("start", e.to_string()))?;

    match end {
        None => Ok(DateRange::since(start_date)),
        Some(end) => {
            let end_date = parse_observation_date(end)
                .map_err(|e| DomainError::invalid_param("end", e.to_string()))?;
            Ok(DateRange::between(start_date, end_date))
        }
    }
}
