//! Event ingestion and listing

use super::AppState;
use crate::error::AppError;
use crate::store::{EventQuery, LogEvent, NewEvent};
use axum::extract::{Query, State};
use axum::Json;

/// POST /logs - Create a new log entry
///
/// Returns the stored event including its assigned id and timestamp.
pub async fn create_log(
    State(state): State<AppState>,
    Json(event): Json<NewEvent>,
) -> Result<Json<LogEvent>, AppError> {
    tracing::info!(level = %event.level, message = %event.message, "Creating log entry");

    let stored = state
        .store
        .insert(event)
        .await
        .map_err(|e| AppError::internal("Failed to create log entry", e))?;

    crate::metrics::record_event_ingested("direct", &stored.level);
    tracing::info!(id = stored.id, "Log entry created");

    Ok(Json(stored))
}

/// GET /logs - Retrieve log entries with optional filtering
///
/// Example: GET /logs?level=ERROR&source=database&skip=0&limit=50
pub async fn list_logs(
    State(state): State<AppState>,
    Query(query): Query<EventQuery>,
) -> Result<Json<Vec<LogEvent>>, AppError> {
    let query = query.capped(state.max_limit);

    let events = state
        .store
        .list(&query)
        .await
        .map_err(|e| AppError::internal("Failed to retrieve logs", e))?;

    Ok(Json(events))
}
