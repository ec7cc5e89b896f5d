/// Error handling for the API server
///
/// All handlers return `ApiResult<T>`. Business errors convert into `ApiError`
/// through `From<ServiceError>`:
///
/// | ServiceError      | Status |
/// |-------------------|--------|
/// | `NotFound`        | 404    |
/// | `AlreadyExists`   | 409    |
/// | `Unauthenticated` | 401    |
/// | `InvalidArgument` | 422    |
/// | `Internal`        | 500    |
///
/// Internal errors are logged with their store cause; clients only see a
/// generic message. Unreadable JSON bodies are reported as `InvalidArgument`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use factory_shared::business::ServiceError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    /// Unauthorized (401)
    Unauthorized(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409), e.g. a second registration for the same subject id
    Conflict(String),

    /// Unprocessable entity (422)
    InvalidArgument(String),

    /// Internal server error (500)
    InternalError(String),
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "not_found", "conflict")
    pub error: String,

    /// Human-readable error message
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InvalidArgument(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_code, message) = match self {
            ApiError::Unauthorized(msg) => ("unauthenticated", msg),
            ApiError::NotFound(msg) => ("not_found", msg),
            ApiError::Conflict(msg) => ("already_exists", msg),
            ApiError::InvalidArgument(msg) => ("invalid_argument", msg),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                ("internal_error", "An internal error occurred".to_string())
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(what) => ApiError::NotFound(format!("{} not found", what)),
            ServiceError::AlreadyExists(what) => {
                ApiError::Conflict(format!("{} already exists", what))
            }
            ServiceError::Unauthenticated(msg) => ApiError::Unauthorized(msg),
            ServiceError::InvalidArgument(msg) => ApiError::InvalidArgument(msg),
            internal @ ServiceError::Internal { .. } => ApiError::InternalError(internal.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidArgument(rejection.body_text())
    }
}
