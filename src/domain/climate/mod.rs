//! Climate domain - Stations, measurements and their aggregates

mod entity;
mod repository;
mod validation;

pub use entity::{
    last_year_cutoff, ActiveStationTemperatures, DailyTemperatureSummary, DateRange, Measurement,
    PrecipitationReading, Station, TemperatureObservation,
};
pub use repository::{ClimateRepository, InMemoryClimateRepository};
pub use validation::{parse_observation_date, DateValidationError, DATE_FORMAT};
