use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;
use thiserror::Error;

/// A payload could not be encoded to or decoded from its stored JSON form
#[derive(Debug, Error)]
#[error("Serialization error: {0}")]
pub struct SerializationError(#[from] pub serde_json::Error);

/// Event store failures
#[derive(Debug, Error)]
pub enum StorageError {
    /// Persistence layer unreachable or write rejected
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failed at startup
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Stored `extra_data` could not be encoded/decoded
    #[error(transparent)]
    Serialization(#[from] SerializationError),

    /// A stored timestamp is outside the representable range
    #[error("Invalid stored timestamp: {0}")]
    InvalidTimestamp(i64),
}

/// Export encoder failures
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Export destination not writable: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Export task aborted: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Webhook queue admission failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WebhookError {
    #[error("Webhook queue is full")]
    QueueFull,

    #[error("Webhook queue is closed")]
    QueueClosed,
}

/// Application error types returned by HTTP handlers
///
/// Internal variants carry the underlying cause for logging, but only the
/// generic `detail` text is ever sent to the caller.
#[derive(Debug)]
pub enum AppError {
    /// Store or export failure behind a direct request
    Internal {
        detail: &'static str,
        source: anyhow::Error,
    },
    /// Webhook could not be queued
    Unavailable(WebhookError),
}

impl AppError {
    pub fn internal(detail: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self::Internal {
            detail,
            source: source.into(),
        }
    }

    fn detail(&self) -> String {
        match self {
            Self::Internal { detail, .. } => (*detail).to_string(),
            Self::Unavailable(err) => err.to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Internal { detail, source } => write!(f, "{}: {:#}", detail, source),
            Self::Unavailable(err) => write!(f, "Service unavailable: {}", err),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Internal { detail, source } => {
                tracing::error!(error = format!("{:#}", source), "{}", detail);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Unavailable(err) => {
                tracing::warn!(error = %err, "Rejected webhook");
                StatusCode::SERVICE_UNAVAILABLE
            }
        };

        let body = Json(json!({
            "detail": self.detail(),
            "type": error_type_name(&self),
        }));

        (status, body).into_response()
    }
}

fn error_type_name(error: &AppError) -> &'static str {
    match error {
        AppError::Internal { .. } => "internal_error",
        AppError::Unavailable(_) => "service_unavailable",
    }
}

impl From<WebhookError> for AppError {
    fn from(err: WebhookError) -> Self {
        Self::Unavailable(err)
    }
}
