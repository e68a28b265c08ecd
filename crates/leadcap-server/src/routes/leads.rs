use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use leadcap_core::{attribution, lead::LeadFields};

use crate::{error::AppError, state::AppState};

/// `POST /api/leads` — capture a form submission.
///
/// Any JSON object is accepted; missing fields are stored as empty strings and
/// unknown fields are kept. The lead is stored before the response is built.
/// The Google Sheets mirror runs in the background and its failure never
/// changes this response.
///
/// ## Response
/// `200 OK` with `{ "success": true, "id": <lead id> }`.
#[tracing::instrument(skip(state, payload))]
pub async fn create_lead(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LeadFields>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(fields) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let lead = state.capture_lead(fields).await;
    Ok(Json(json!({ "success": true, "id": lead.id })))
}

/// `GET /api/leads` — every captured lead, in submission order.
pub async fn list_leads(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.leads.list_all().await)
}

/// `GET /api/leads/source/{source}` — case-insensitive source match, with
/// click-id fallbacks for `google` and `facebook`.
pub async fn leads_by_source(
    State(state): State<Arc<AppState>>,
    Path(source): Path<String>,
) -> impl IntoResponse {
    let leads = state.leads.list_all().await;
    Json(attribution::by_source(&leads, &source))
}

/// `GET /api/leads/campaign/{campaign}` — exact campaign match.
pub async fn leads_by_campaign(
    State(state): State<Arc<AppState>>,
    Path(campaign): Path<String>,
) -> impl IntoResponse {
    let leads = state.leads.list_all().await;
    Json(attribution::by_campaign(&leads, &campaign))
}
