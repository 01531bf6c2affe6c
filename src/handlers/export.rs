use super::AppState;
use crate::error::AppError;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

/// Response for a CSV export
#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub message: String,
    pub filename: String,
    pub records_exported: usize,
}

/// GET /export/csv - Write every stored event to a CSV file
pub async fn export_csv(State(state): State<AppState>) -> Result<Json<ExportResponse>, AppError> {
    let result = state
        .exporter
        .export(&state.store)
        .await
        .map_err(|e| AppError::internal("Failed to export logs", e))?;

    Ok(Json(ExportResponse {
        message: "Export completed".to_string(),
        filename: result.filename,
        records_exported: result.record_count,
    }))
}
