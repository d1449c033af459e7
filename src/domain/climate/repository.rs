//! Climate repository trait

use async_trait::async_trait;
use chrono::NaiveDate;

use super::{
    ActiveStationTemperatures, DailyTemperatureSummary, DateRange, PrecipitationReading, Station,
};
use crate::domain::DomainError;

/// Read-only access to the measurement and station tables.
///
/// Each method is one request's worth of work and runs on a single session.
#[async_trait]
pub trait ClimateRepository: Send + Sync + std::fmt::Debug {
    /// Precipitation readings from the last year of data, in store order
    async fn precipitation_last_year(&self) -> Result<Vec<PrecipitationReading>, DomainError>;

    /// All stations in store order
    async fn stations(&self) -> Result<Vec<Station>, DomainError>;

    /// Last year of temperatures for the station with the most measurements.
    /// Ties go to the lexicographically smallest station code.
    async fn most_active_station_temperatures(
        &self,
    ) -> Result<ActiveStationTemperatures, DomainError>;

    /// Per-date temperature summaries within `range`, ordered by date
    async fn daily_temperature_summaries(
        &self,
        range: DateRange,
    ) -> Result<Vec<DailyTemperatureSummary>, DomainError>;

    /// Check that the store answers queries
    async fn ping(&self) -> Result<(), DomainError>;
}

/// In-memory implementation of ClimateRepository
pub mod in_memory {
    use super::*;
    use std::collections::BTreeMap;

    use crate::domain::climate::{last_year_cutoff, Measurement, TemperatureObservation};

    /// In-memory implementation of ClimateRepository for testing and development
    #[derive(Debug, Default)]
    pub struct InMemoryClimateRepository {
        stations: Vec<Station>,
        measurements: Vec<Measurement>,
    }

    impl InMemoryClimateRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_station(mut self, station: Station) -> Self {
            self.stations.push(station);
            self
        }

        pub fn with_measurement(mut self, measurement: Measurement) -> Self {
            self.measurements.push(measurement);
            self
        }

        pub fn with_measurements(mut self, measurements: Vec<Measurement>) -> Self {
            self.measurements.extend(measurements);
            self
        }

        fn cutoff(&self) -> Option<NaiveDate> {
            self.measurements.iter().map(|m| m.date).max().map(last_year_cutoff)
        }

        fn most_active_station(&self) -> Option<String> {
            let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

            for m in &self.measurements {
                *counts.entry(m.station.as_str()).or_default() += 1;
            }

            // BTreeMap iterates in ascending key order, so the first maximum wins ties
            let mut best: Option<(&str, usize)> = None;

            for (station, count) in counts {
                if best.is_none_or(|(_, best_count)| count > best_count) {
                    best = Some((station, count));
                }
            }

            best.map(|(station, _)| station.to_string())
        }
    }

    #[async_trait]
    impl ClimateRepository for InMemoryClimateRepository {
        async fn precipitation_last_year(&self) -> Result<Vec<PrecipitationReading>, DomainError> {
            let Some(cutoff) = self.cutoff() else {
                return Ok(Vec::new());
            };

            Ok(self
                .measurements
                .iter()
                .filter(|m| m.date >= cutoff)
                .map(|m| PrecipitationReading {
                    date: m.date,
                    prcp: m.prcp,
                })
                .collect())
        }

        async fn stations(&self) -> Result<Vec<Station>, DomainError> {
            Ok(self.stations.clone())
        }

        async fn most_active_station_temperatures(
            &self,
        ) -> Result<ActiveStationTemperatures, DomainError> {
            let (Some(cutoff), Some(station)) = (self.cutoff(), self.most_active_station()) else {
                return Ok(ActiveStationTemperatures::default());
            };

            let observations = self
                .measurements
                .iter()
                .filter(|m| m.station == station && m.date >= cutoff)
                .map(|m| TemperatureObservation {
                    date: m.date,
                    tobs: m.tobs,
                })
                .collect();

            Ok(ActiveStationTemperatures {
                station: Some(station),
                observations,
            })
        }

        async fn daily_temperature_summaries(
            &self,
            range: DateRange,
        ) -> Result<Vec<DailyTemperatureSummary>, DomainError> {
            let mut by_date: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();

            for m in self.measurements.iter().filter(|m| range.contains(m.date)) {
                by_date.entry(m.date).or_default().push(m.tobs);
            }

            Ok(by_date
                .into_iter()
                .map(|(date, temps)| {
                    let min = temps.iter().copied().fold(f64::INFINITY, f64::min);
                    let max = temps.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                    let avg = temps.iter().sum::<f64>() / temps.len() as f64;

                    DailyTemperatureSummary { date, min, avg, max }
                })
                .collect())
        }

        async fn ping(&self) -> Result<(), DomainError> {
            Ok(())
        }
    }
}

pub use in_memory::InMemoryClimateRepository;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::climate::Measurement;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn measurement(station: &str, day: &str, prcp: Option<f64>, tobs: f64) -> Measurement {
        Measurement::new(station, date(day), prcp, tobs)
    }

    #[tokio::test]
    async fn test_empty_repository() {
        let repo = InMemoryClimateRepository::new();

        assert!(repo.precipitation_last_year().await.unwrap().is_empty());
        assert_eq!(
            repo.most_active_station_temperatures().await.unwrap(),
            ActiveStationTemperatures::default()
        );
    }

    #[tokio::test]
    async fn test_precipitation_keeps_duplicate_dates() {
        let repo = InMemoryClimateRepository::new().with_measurements(vec![
            measurement("A", "2016-01-01", Some(9.0), 60.0),
            measurement("A", "2017-02-10", Some(0.1), 70.0),
            measurement("B", "2017-02-10", None, 71.0),
            measurement("A", "2016-02-10", Some(0.5), 65.0),
        ]);

        let readings = repo.precipitation_last_year().await.unwrap();

        assert_eq!(readings.len(), 3);
        assert_eq!(readings[0].prcp, Some(0.1));
        assert_eq!(readings[1].prcp, None);
        assert_eq!(readings[2].date, date("2016-02-10"));
    }

    #[tokio::test]
    async fn test_most_active_station_by_count() {
        let mut rows = Vec::new();
        for day in 1..=10 {
            rows.push(measurement("A", &format!("2017-01-{day:02}"), None, 60.0));
        }
        for day in 1..=20 {
            rows.push(measurement("B", &format!("2017-02-{day:02}"), None, 70.0));
        }
        let repo = InMemoryClimateRepository::new().with_measurements(rows);

        let result = repo.most_active_station_temperatures().await.unwrap();

        assert_eq!(result.station.as_deref(), Some("B"));
        assert_eq!(result.observations.len(), 20);
        assert!(result.observations.iter().all(|o| o.tobs == 70.0));
    }

    #[tokio::test]
    async fn test_most_active_station_tie_prefers_smallest_code() {
        let repo = InMemoryClimateRepository::new().with_measurements(vec![
            measurement("USC2", "2017-01-01", None, 61.0),
            measurement("USC1", "2017-01-01", None, 62.0),
            measurement("USC2", "2017-01-02", None, 63.0),
            measurement("USC1", "2017-01-02", None, 64.0),
        ]);

        let result = repo.most_active_station_temperatures().await.unwrap();

        assert_eq!(result.station.as_deref(), Some("USC1"));
    }

    #[tokio::test]
    async fn test_daily_summary_groups_by_date() {
        let repo = InMemoryClimateRepository::new().with_measurements(vec![
            measurement("A", "2016-06-01", None, 70.0),
            measurement("B", "2016-06-01", None, 80.0),
            measurement("A", "2016-06-02", None, 75.0),
        ]);

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
    async fn test_daily_summary_reversed_range_is_empty() {
        let repo = InMemoryClimateRepository::new()
            .with_measurement(measurement("A", "2016-06-02", None, 75.0));

        let summaries = repo
            .daily_temperature_summaries(DateRange::between(date("2016-06-03"), date("2016-06-01")))
            .await
            .unwrap();

        assert!(summaries.is_empty());
    }
}
