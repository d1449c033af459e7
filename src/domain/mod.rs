//! Domain layer - Core entities, validation and repository traits

pub mod climate;
pub mod error;

pub use climate::{
    last_year_cutoff, parse_observation_date, ActiveStationTemperatures, ClimateRepository,
    DailyTemperatureSummary, DateRange, DateValidationError, InMemoryClimateRepository,
    Measurement, PrecipitationReading, Station, TemperatureObservation,
};
pub use error::DomainError;
