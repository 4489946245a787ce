//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::services::AvailabilityError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request (validation error)
    BadRequest(String),
    /// Resource not found
    NotFound(String),
    /// Internal server error
    Internal(String),
    /// Pipeline error
    Availability(AvailabilityError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg)),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
            AppError::Availability(err) => match err {
                AvailabilityError::EventNotFound(_) => {
                    (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", err.to_string()))
                }
                AvailabilityError::DataIntegrity { .. } => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("DATA_INTEGRITY", err.to_string()),
                ),
                AvailabilityError::Store(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("STORE_ERROR", err.to_string()),
                ),
            },
        };

        (status, Json(error)).into_response()
    }
}

impl From<AvailabilityError> for AppError {
    fn from(err: AvailabilityError) -> Self {
        AppError::Availability(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventId;

    #[test]
    fn test_event_not_found_maps_to_404() {
        let response =
            AppError::from(AvailabilityError::EventNotFound(EventId::new())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_data_integrity_maps_to_500() {
        let err = AvailabilityError::DataIntegrity {
            event: EventId::new(),
            attribute: "status",
            found: 2,
        };
        let response = AppError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
