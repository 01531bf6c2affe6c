use super::AppState;
use crate::analytics::{generate_report, AnalyticsReport};
use crate::error::AppError;
use axum::extract::State;
use axum::Json;

/// GET /analytics - Level/source histograms and recent activity
pub async fn get_analytics(State(state): State<AppState>) -> Result<Json<AnalyticsReport>, AppError> {
    let report = generate_report(&state.store)
        .await
        .map_err(|e| AppError::internal("Failed to generate analytics", e))?;

    Ok(Json(report))
}
