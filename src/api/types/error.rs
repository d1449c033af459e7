//! JSON error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Error categories reported in the `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorType {
    InvalidRequestError,
    NotFoundError,
    ServerError,
}

impl std::fmt::Display for ApiErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequestError => write!(f, "invalid_request_error"),
            Self::NotFoundError => write!(f, "not_found_error"),
            Self::ServerError => write!(f, "server_error"),
        }
    }
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Error detail structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: ApiErrorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, error_type: ApiErrorType, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: ApiErrorDetail {
                    message: message.into(),
                    error_type,
                    param: None,
                },
            },
        }
    }

    /// Add parameter info
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.response.error.param = Some(param.into());
        self
    }

    /// Bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiErrorType::InvalidRequestError, message)
    }

    /// Not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiErrorType::NotFoundError, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ApiErrorType::ServerError, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation { param, message } => {
                let api_err = Self::bad_request(message);
                match param {
                    Some(param) => api_err.with_param(param),
                    None => api_err,
                }
            }
            DomainError::Storage { message } => Self::internal(message),
            DomainError::Schema { message } => Self::internal(message),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.response.error.error_type, self.response.error.message
        )
    }
}

impl std::error::Error for ApiError {}
