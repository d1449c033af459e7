//! JSON records returned by the climate endpoints
//!
//! Field order of each struct is the key order on the wire.

use chrono::NaiveDate;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::domain::climate::DATE_FORMAT;
use crate::domain::{
    DailyTemperatureSummary, PrecipitationReading, Station, TemperatureObservation,
};

/// `{"<date>": prcp}`, one record per measurement row
#[derive(Debug, Clone, PartialEq)]
pub struct PrecipitationRecord {
    pub date: NaiveDate,
    pub prcp: Option<f64>,
}

impl Serialize for PrecipitationRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.date.format(DATE_FORMAT).to_string(), &self.prcp)?;
        map.end()
    }
}

impl From<PrecipitationReading> for PrecipitationRecord {
    fn from(reading: PrecipitationReading) -> Self {
        Self {
            date: reading.date,
            prcp: reading.prcp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Station")]
    pub station: String,
    #[serde(rename = "Name")]
    pub name: String,
}

impl From<Station> for StationRecord {
    fn from(station: Station) -> Self {
        Self {
            id: station.id,
            station: station.station,
            name: station.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRecord {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Temp")]
    pub temp: f64,
}

impl From<TemperatureObservation> for TemperatureRecord {
    fn from(observation: TemperatureObservation) -> Self {
        Self {
            date: observation.date,
            temp: observation.tobs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSummaryRecord {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "TMIN")]
    pub tmin: f64,
    #[serde(rename = "TAVG")]
    pub tavg: f64,
    #[serde(rename = "TMAX")]
    pub tmax: f64,
}

impl From<DailyTemperatureSummary> for TemperatureSummaryRecord {
    fn from(summary: DailyTemperatureSummary) -> Self {
        Self {
            date: summary.date,
            tmin: summary.min,
            tavg: summary.avg,
            tmax: summary.max,
        }
    }
}

/// Convert domain rows into wire records, preserving order
pub fn to_records<T, R>(rows: Vec<T>) -> Vec<R>
where
    R: From<T>,
{
    rows.into_iter().map(R::from).collect()
}
