//! Error handling for the pet care backend
//!
//! Centralized error types and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;
use thiserror::Error;

use crate::models::membership::ResourceClass;

/// Path of the plan upgrade flow a caller should redirect to when a limit is hit
pub const UPGRADE_PATH: &str = "/planes";

/// Marker raised by the pets trigger when an owner's tier is exhausted
pub const PET_LIMIT_MARKER: &str = "PET_LIMIT_REACHED";

/// Marker raised by the medical records trigger when a pet's slots are exhausted
pub const DOC_LIMIT_MARKER: &str = "DOC_LIMIT_REACHED";

/// A write the store refused to commit
#[derive(Error, Debug)]
pub enum WriteError {
    /// The server-side resource guard rejected the insert
    #[error("{0} limit reached for the current plan")]
    LimitReached(ResourceClass),

    #[error("Write rejected: {0}")]
    Rejected(#[source] sqlx::Error),
}

impl From<sqlx::Error> for WriteError {
    fn from(error: sqlx::Error) -> Self {
        let guard = match &error {
            sqlx::Error::Database(db_error) => {
                let message = db_error.message();
                if message.contains(PET_LIMIT_MARKER) {
                    Some(ResourceClass::Pet)
                } else if message.contains(DOC_LIMIT_MARKER) {
                    Some(ResourceClass::DocumentationSlot)
                } else {
                    None
                }
            }
            _ => None,
        };

        match guard {
            Some(resource) => WriteError::LimitReached(resource),
            None => WriteError::Rejected(error),
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Read failure: connectivity or permission
    #[error("Query error: {0}")]
    Query(#[source] sqlx::Error),

    #[error(transparent)]
    Write(#[from] WriteError),

    /// Caller-side input problem detected before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// An equivalent medical record already exists for the pet
    #[error("Duplicate record: {0}")]
    Duplicate(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Query(_) | AppError::Internal(_) | AppError::Configuration(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Write(WriteError::LimitReached(_)) | AppError::Duplicate(_) => {
                StatusCode::CONFLICT
            }
            AppError::Write(WriteError::Rejected(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Query(_) => "QueryError",
            AppError::Write(WriteError::LimitReached(_)) => "LimitReached",
            AppError::Write(WriteError::Rejected(_)) => "WriteError",
            AppError::Validation(_) => "ValidationError",
            AppError::Duplicate(_) => "DuplicateRecord",
            AppError::NotFound(_) => "NotFound",
            AppError::Unauthorized => "Unauthorized",
            AppError::Configuration(_) => "ConfigurationError",
            AppError::Internal(_) => "InternalError",
        }
    }

    /// Check if this error should be logged as an error vs warning
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            AppError::Query(_) | AppError::Internal(_) | AppError::Configuration(_)
        )
    }

    /// True when the caller should be sent to the upgrade flow
    pub fn is_limit_reached(&self) -> bool {
        matches!(self, AppError::Write(WriteError::LimitReached(_)))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn not_found(resource: &str) -> Self {
        AppError::NotFound(format!("{resource} not found"))
    }

    pub fn limit_reached(resource: ResourceClass) -> Self {
        AppError::Write(WriteError::LimitReached(resource))
    }

    /// Map a failed write into the write taxonomy
    pub fn write(error: sqlx::Error) -> Self {
        AppError::Write(WriteError::from(error))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();

        if self.is_server_error() {
            tracing::error!(error = %message, code = error_code, "request failed");
        } else {
            tracing::warn!(error = %message, code = error_code, "request rejected");
        }

        let mut body = json!({
            "error": error_code,
            "message": message,
            "timestamp": Utc::now().timestamp(),
        });
        if self.is_limit_reached() {
            body["upgrade_path"] = json!(UPGRADE_PATH);
        }

        (status, Json(body)).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
