use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::Response,
};

use leadcap_core::export::to_csv;

use crate::{error::AppError, state::AppState};

/// `GET /api/leads/export` — all leads as a CSV download.
///
/// The filename carries the current UTC date: `leads_YYYY-MM-DD.csv`.
#[tracing::instrument(skip(state))]
pub async fn export_leads(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let leads = state.leads.list_all().await;
    let csv = to_csv(&leads).map_err(|e| AppError::Internal(e.into()))?;
    let filename = format!("leads_{}.csv", chrono::Utc::now().format("%Y-%m-%d"));

    tracing::info!(rows = leads.len(), %filename, "Leads exported");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={filename}"),
        )
        .body(axum::body::Body::from(csv))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("response build failed: {e}")))
}
