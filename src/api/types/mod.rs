//! API wire types

pub mod climate;
pub mod error;

pub use climate::{
    to_records, PrecipitationRecord, StationRecord, TemperatureRecord, TemperatureSummaryRecord,
};
pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
