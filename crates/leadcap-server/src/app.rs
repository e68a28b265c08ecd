use std::sync::Arc;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{routes, state::AppState};

/// Construct the Axum [`Router`] with all routes and middleware attached.
///
/// Middleware is applied in outer-to-inner order (outermost runs first on
/// request, last on response):
///
/// 1. `TraceLayer` — structured request/response logging via `tracing`.
/// 2. `CorsLayer` — the lead form is usually served from a different origin
///    than this API. `LEADCAP_CORS_ORIGINS` narrows it; unset allows any.
pub fn build_app(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(routes::health::health))
        .route(
            "/api/leads",
            post(routes::leads::create_lead).get(routes::leads::list_leads),
        )
        .route("/api/leads/export", get(routes::export::export_leads))
        .route(
            "/api/leads/source/{source}",
            get(routes::leads::leads_by_source),
        )
        .route(
            "/api/leads/campaign/{campaign}",
            get(routes::leads::leads_by_campaign),
        )
        .route(
            "/api/campaigns/stats",
            get(routes::campaigns::get_campaign_stats),
        )
        .route("/api/sheets/setup", post(routes::sheets::setup_headers))
        .route("/api/sheets/test", get(routes::sheets::test_connection))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();
    if allowed.is_empty() {
        base.allow_origin(Any)
    } else {
        base.allow_origin(AllowOrigin::list(allowed))
    }
}
