use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use leadcap_server::state::AppState;
use leadcap_sheets::SheetSync;

/// `leadcap health` — liveness probe for Docker HEALTHCHECK.
///
/// Calls `GET http://localhost:$PORT/health`.
/// Exits 0 if the server responds with HTTP 200, exits 1 otherwise.
fn run_health_check() -> ! {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let url = format!("http://localhost:{}/health", port);
    match ureq::get(&url).call() {
        Ok(resp) if resp.status() == 200 => std::process::exit(0),
        _ => std::process::exit(1),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(|s| s.as_str()) == Some("health") {
        run_health_check();
    }
    // Structured JSON logging. Level controlled via RUST_LOG env var.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("leadcap=info".parse()?),
        )
        .json()
        .init();

    let cfg = leadcap_server::config::Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let sheets = SheetSync::from_config(&cfg.sheets)?;
    if sheets.is_enabled() {
        info!(
            spreadsheet_id = %cfg.sheets.spreadsheet_id,
            sheet = %cfg.sheets.sheet_name,
            "Testing Google Sheets connection"
        );
        if sheets.test_connection().await {
            info!("Google Sheets ready for automatic sync");
        } else {
            warn!("Google Sheets not reachable; leads will still be captured in memory");
        }
    } else {
        warn!(
            "Google Sheets integration disabled. Set GOOGLE_CLIENT_ID, GOOGLE_CLIENT_SECRET \
             and GOOGLE_REFRESH_TOKEN to enable."
        );
    }

    let state = Arc::new(AppState::new(cfg.clone(), sheets));

    let addr = format!("0.0.0.0:{}", cfg.port);
    let app = leadcap_server::app::build_app(Arc::clone(&state));

    info!(port = cfg.port, "leadcap listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    // Appends are individually bounded by the same timeout.
    state.sheets.drain(cfg.sheets.timeout()).await;

    info!(leads = state.leads.len().await, "Shutting down; in-memory leads discarded");
    Ok(())
}
