//! API error type with IntoResponse
//!
//! Core error kinds are converted to JSON responses with the status codes
//! of the public contract:
//! - invalid_input → 422
//! - conflict → 409
//! - not_found → 404
//! - storage_unavailable → 503 (logged, generic message)

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use roster_core::{Error, ErrorKind, ValidationError};

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Error from the record store or query engine
    Core(Error),

    /// Body or query string could not be decoded (422)
    Malformed { message: String },
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Core(e) => e.kind(),
            Self::Malformed { .. } => ErrorKind::InvalidInput,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::InvalidInput => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::StorageUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Core(Error::StorageUnavailable { reason }) => {
                // Log the actual error, return generic message
                tracing::error!("Storage error: {}", reason);
                "storage is unavailable, try again later".to_string()
            }
            Self::Core(e) => e.to_string(),
            Self::Malformed { message } => message.clone(),
        };

        let body = json!({
            "error": self.kind().as_str(),
            "message": message
        });

        (status, Json(body)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self::Core(e)
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Core(Error::InvalidInput(e))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Malformed {
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Malformed {
            message: rejection.body_text(),
        }
    }
}
