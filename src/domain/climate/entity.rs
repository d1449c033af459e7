//! Climate entities: stations, measurements and per-request aggregates

use chrono::{Months, NaiveDate};

/// A fixed weather-recording location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    pub id: i64,
    /// Station code referenced by measurements (e.g. "USC00519281")
    pub station: String,
    pub name: String,
}

impl Station {
    pub fn new(id: i64, station: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            station: station.into(),
            name: name.into(),
        }
    }
}

/// A per-station, per-date weather reading
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub station: String,
    pub date: NaiveDate,
    /// Precipitation, absent for some readings
    pub prcp: Option<f64>,
    /// Observed temperature
    pub tobs: f64,
}

impl Measurement {
    pub fn new(station: impl Into<String>, date: NaiveDate, prcp: Option<f64>, tobs: f64) -> Self {
        Self {
            station: station.into(),
            date,
            prcp,
            tobs,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrecipitationReading {
    pub date: NaiveDate,
    pub prcp: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureObservation {
    pub date: NaiveDate,
    pub tobs: f64,
}

/// Temperatures of the station with the most recorded measurements
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActiveStationTemperatures {
    /// `None` when there are no measurements at all
    pub station: Option<String>,
    pub observations: Vec<TemperatureObservation>,
}

/// Min/avg/max of `tobs` over every measurement sharing one date
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTemperatureSummary {
    pub date: NaiveDate,
    pub min: f64,
    pub avg: f64,
    pub max: f64,
}

/// Inclusive date range with an optional upper bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: Option<NaiveDate>,
}

impl DateRange {
    /// Every date from `start` onwards
    pub fn since(start: NaiveDate) -> Self {
        Self { start, end: None }
    }

    /// Dates in `[start, end]`; empty when `end < start`
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.end.is_some_and(|end| end < self.start)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && self.end.is_none_or(|end| date <= end)
    }
}

/// Start of the "last year" window ending at the most recent recorded date.
///
/// Steps back one calendar year, so 2017-02-10 maps to 2016-02-10 even though
/// a leap day lies in between. A leap day itself maps to February 28th.
pub fn last_year_cutoff(latest: NaiveDate) -> NaiveDate {
    latest
        .checked_sub_months(Months::new(12))
        .unwrap_or(NaiveDate::MIN)
}
