use super::AppState;
use crate::error::AppError;
use crate::store::ExtraData;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

/// POST /external-api/webhook - Accept a payload for background ingestion
///
/// Answers as soon as the payload is queued; the derived log event is
/// written later by a webhook worker.
pub async fn handle_webhook(
    State(state): State<AppState>,
    Json(payload): Json<ExtraData>,
) -> Result<Json<Value>, AppError> {
    state.webhooks.submit(payload)?;

    Ok(Json(json!({
        "status": "accepted",
        "message": "Webhook data will be processed"
    })))
}
