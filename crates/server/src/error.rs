use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use enrich::{CanonicalRecord, ProjectionError, ProviderError};

use crate::services::JobError;
use crate::utils::TabularError;

/// Unified application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid request input (missing query, bad column list)
    #[error("{message}")]
    Validation {
        message: String,
        invalid_columns: Vec<String>,
    },

    /// Malformed request body or upload
    #[error("{0}")]
    BadRequest(String),

    /// Resource not found
    #[error("{0}")]
    NotFound(String),

    /// Reconciliation produced no usable data after retries. A designated
    /// outcome, not a server fault.
    #[error("{0}")]
    NoData(String),

    /// Provider failure surviving the retry budget
    #[error("Enrichment failed: {0}")]
    Enrichment(#[from] ProviderError),

    /// Uploaded file could not be read as tabular data
    #[error("Upload error: {0}")]
    Tabular(#[from] TabularError),

    /// Job lifecycle error
    #[error("Job error: {0}")]
    Job(#[from] JobError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// API error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: bool,
    status: u16,
    message: String,
    #[serde(rename = "invalidColumns", skip_serializing_if = "Option::is_none")]
    invalid_columns: Option<Vec<String>>,
    #[serde(rename = "availableColumns", skip_serializing_if = "Option::is_none")]
    available_columns: Option<Vec<&'static str>>,
}

impl ErrorResponse {
    fn new(status: StatusCode, message: String) -> Self {
        Self {
            error: true,
            status: status.as_u16(),
            message,
            invalid_columns: None,
            available_columns: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation {
                message,
                invalid_columns,
            } => {
                let status = StatusCode::BAD_REQUEST;
                let mut body = ErrorResponse::new(status, message);
                if !invalid_columns.is_empty() {
                    body.invalid_columns = Some(invalid_columns);
                }
                body.available_columns = Some(CanonicalRecord::COLUMNS.to_vec());
                (status, body)
            }
            AppError::BadRequest(message) => {
                let status = StatusCode::BAD_REQUEST;
                (status, ErrorResponse::new(status, message))
            }
            AppError::NotFound(message) => {
                let status = StatusCode::NOT_FOUND;
                (status, ErrorResponse::new(status, message))
            }
            AppError::NoData(message) => {
                let status = StatusCode::NOT_FOUND;
                (status, ErrorResponse::new(status, message))
            }
            AppError::Enrichment(e) => {
                tracing::error!("Enrichment failed: {}", e);
                let status = StatusCode::BAD_GATEWAY;
                (
                    status,
                    ErrorResponse::new(status, format!("Enrichment failed: {}", e)),
                )
            }
            AppError::Tabular(e) => {
                let status = StatusCode::BAD_REQUEST;
                (status, ErrorResponse::new(status, e.to_string()))
            }
            AppError::Job(e) => {
                let status = match &e {
                    JobError::NotFound(_) => StatusCode::NOT_FOUND,
                    JobError::InvalidTransition { .. } => StatusCode::CONFLICT,
                    JobError::Database(inner) => {
                        tracing::error!("Job persistence error: {}", inner);
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, ErrorResponse::new(status, e.to_string()))
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                (status, ErrorResponse::new(status, "Database error".to_string()))
            }
            AppError::Internal(message) => {
                tracing::error!("Internal error: {}", message);
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                (status, ErrorResponse::new(status, message))
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ProjectionError> for AppError {
    fn from(e: ProjectionError) -> Self {
        match e {
            ProjectionError::NoColumns => AppError::Validation {
                message: e.to_string(),
                invalid_columns: Vec::new(),
            },
            ProjectionError::InvalidColumns(columns) => AppError::Validation {
                message: "Some requested columns are not available".to_string(),
                invalid_columns: columns,
            },
        }
    }
}

/// Convenience type alias
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
