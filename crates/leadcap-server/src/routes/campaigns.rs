use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};

use leadcap_core::attribution::campaign_stats;

use crate::state::AppState;

/// `GET /api/campaigns/stats` — leads grouped by `utm_campaign`.
///
/// Recomputed on every call. Buckets appear in order of first submission;
/// each bucket's `source`/`medium` come from its first lead.
pub async fn get_campaign_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let leads = state.leads.list_all().await;
    Json(campaign_stats(&leads))
}
