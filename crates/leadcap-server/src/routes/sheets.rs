use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::{error::AppError, state::AppState};

/// `POST /api/sheets/setup` — write and style the header row. Run once per
/// sheet; repeating it is harmless.
///
/// Returns `503 sheets_not_initialized` when credentials are not configured
/// and a `5xx` with the upstream message when Google rejects the call.
#[tracing::instrument(skip(state))]
pub async fn setup_headers(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    state.sheets.ensure_headers().await?;
    Ok(Json(json!({
        "success": true,
        "message": "Headers setup successfully"
    })))
}

/// `GET /api/sheets/test` — reachability check for the configured spreadsheet.
///
/// Always `200`; `success` carries the result.
#[tracing::instrument(skip(state))]
pub async fn test_connection(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if !state.sheets.is_enabled() {
        return Json(json!({
            "success": false,
            "enabled": false,
            "message": "Google Sheets integration disabled"
        }));
    }

    let connected = state.sheets.test_connection().await;
    let message = if connected {
        "Connected"
    } else {
        "Failed to connect"
    };
    Json(json!({
        "success": connected,
        "enabled": true,
        "message": message
    }))
}
