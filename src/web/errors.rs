//! # Web API Errors
//!
//! HTTP error type and its JSON body: `{"error": {"code", "message"}}`.
//! Server-side failures are logged here and answered with a generic message.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::error::ProcessMiningError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Invalid request: {message}")]
    BadRequest { message: String },

    #[error("Resource not found: {message}")]
    NotFound { message: String },

    #[error("Service temporarily unavailable: {message}")]
    ServiceUnavailable { message: String },

    #[error("Upstream service failed: {message}")]
    Upstream { message: String },

    #[error("Upstream service timed out")]
    UpstreamTimeout,

    #[error("Database operation failed")]
    DatabaseError,

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Self::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            Self::DatabaseError | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => "BAD_REQUEST",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::ServiceUnavailable { .. } => "SERVICE_UNAVAILABLE",
            Self::Upstream { .. } => "UPSTREAM_ERROR",
            Self::UpstreamTimeout => "UPSTREAM_TIMEOUT",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::Internal => "INTERNAL_ERROR",
        }
    }

    fn message(&self) -> String {
        match self {
            Self::BadRequest { message }
            | Self::NotFound { message }
            | Self::ServiceUnavailable { message }
            | Self::Upstream { message } => message.clone(),
            Self::UpstreamTimeout => "Upstream service timed out".to_string(),
            Self::DatabaseError => "Database operation failed".to_string(),
            Self::Internal => "Internal server error".to_string(),
        }
    }
}

impl From<ProcessMiningError> for ApiError {
    fn from(err: ProcessMiningError) -> Self {
        match err {
            ProcessMiningError::Validation(message) => Self::BadRequest { message },
            ProcessMiningError::NotFound(message) => Self::NotFound { message },
            ProcessMiningError::ServiceUnavailable(message) => {
                warn!(reason = %message, "Service unavailable");
                Self::ServiceUnavailable { message }
            }
            ProcessMiningError::Upstream(message) => {
                warn!(error = %message, "Upstream call failed");
                Self::Upstream {
                    message: "Assistant service returned an invalid response".to_string(),
                }
            }
            ProcessMiningError::UpstreamTimeout { timeout_ms } => {
                warn!(timeout_ms = timeout_ms, "Upstream call timed out");
                Self::UpstreamTimeout
            }
            ProcessMiningError::Database(details) => {
                error!(error = %details, "Database operation failed");
                Self::DatabaseError
            }
            ProcessMiningError::Configuration(details) | ProcessMiningError::Internal(details) => {
                error!(error = %details, "Internal error");
                Self::Internal
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": {
                "code": self.error_code(),
                "message": self.message(),
            }
        });

        (self.status_code(), Json(body)).into_response()
    }
}

/// Result type for web handlers
pub type ApiResult<T> = Result<T, ApiError>;
