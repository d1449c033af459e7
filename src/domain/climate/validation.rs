//! Observation date validation

use std::fmt;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Wire and storage format of observation dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Exactly `YYYY-MM-DD` in ASCII digits; chrono alone would also accept unpadded fields
static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap());

/// Date validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum DateValidationError {
    /// Input is empty
    Empty,
    /// Input is not shaped like `YYYY-MM-DD`
    InvalidFormat { value: String },
    /// Input is shaped correctly but names no calendar day
    InvalidDate { value: String },
}

impl fmt::Display for DateValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Date cannot be empty"),
            Self::InvalidFormat { value } => {
                write!(f, "Invalid date format '{}': expected YYYY-MM-DD", value)
            }
            Self::InvalidDate { value } => {
                write!(f, "Invalid date '{}': no such calendar day", value)
            }
        }
    }
}

impl std::error::Error for DateValidationError {}

/// Parse a `YYYY-MM-DD` string into a calendar date
pub fn parse_observation_date(value: &str) -> Result<NaiveDate, DateValidationError> {
    if value.is_empty() {
        return Err(DateValidationError::Empty);
    }

    if !DATE_PATTERN.is_match(value) {
        return Err(DateValidationError::InvalidFormat {
            value: value.to_string(),
        });
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| DateValidationError::InvalidDate {
        value: value.to_string(),
    })
}
