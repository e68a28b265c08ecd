use std::sync::Arc;

use tracing::info;

use leadcap_core::{
    lead::{Lead, LeadFields},
    store::LeadStore,
};
use leadcap_sheets::SheetSync;

use crate::config::Config;

/// Shared application state injected into every Axum handler via
/// [`axum::extract::State`].
pub struct AppState {
    /// Parsed configuration, loaded once at startup from environment variables.
    pub config: Arc<Config>,

    /// Every lead captured since the process started. Not persisted.
    pub leads: LeadStore,

    /// Google Sheets mirror. Disabled when credentials are absent.
    pub sheets: Arc<SheetSync>,
}

impl AppState {
    pub fn new(config: Config, sheets: SheetSync) -> Self {
        Self {
            config: Arc::new(config),
            leads: LeadStore::new(),
            sheets: Arc::new(sheets),
        }
    }

    /// Store a submission and mirror it to the sheet in the background.
    ///
    /// The store write is complete when this returns; the sheet append may
    /// still be in flight and its outcome only reaches the logs.
    pub async fn capture_lead(&self, fields: LeadFields) -> Arc<Lead> {
        let lead = self.leads.append(fields).await;

        info!(
            lead_id = lead.id,
            name = %lead.display_name(),
            source = %non_empty_or(&lead.utm_source, "direct"),
            campaign = %non_empty_or(&lead.utm_campaign, "none"),
            "New lead captured"
        );

        let _ = self.sheets.dispatch(Arc::clone(&lead));
        lead
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}
