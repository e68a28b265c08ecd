use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// `GET /health` — liveness check.
///
/// The store is in memory and the sheet mirror is optional, so a running
/// process is a healthy one.
///
/// Response shape:
/// ```json
/// { "status": "healthy", "version": "0.1.0" }
/// ```
pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}
