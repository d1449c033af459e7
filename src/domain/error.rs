use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation {
        param: Option<String>,
        message: String,
    },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Schema error: {message}")]
    Schema { message: String },
}

impl DomainError {
    /// Validation failure attributed to a named request parameter
    pub fn invalid_param(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            param: Some(param.into()),
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        Self::storage(err.to_string())
    }
}
