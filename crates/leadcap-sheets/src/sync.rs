use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono_tz::Tz;
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use leadcap_core::config::{SheetsConfig, DEFAULT_SHEETS_TIMEOUT_MS, DEFAULT_SHEETS_TIMEZONE};
use leadcap_core::lead::Lead;

use crate::{
    error::SheetsError,
    google::GoogleSheetsClient,
    row::{sheet_row, SHEET_HEADERS},
    sink::{AppendReceipt, SheetSink},
};

/// Outcome of mirroring one lead.
///
/// Logged by [`SheetSync::dispatch`] and never reported to the HTTP caller.
#[derive(Debug)]
pub enum SyncOutcome {
    Appended(AppendReceipt),
    /// No credentials configured.
    Disabled,
    Failed(SheetsError),
}

impl SyncOutcome {
    pub fn is_appended(&self) -> bool {
        matches!(self, SyncOutcome::Appended(_))
    }
}

/// Sheet sync adapter.
///
/// Holds `None` when credentials are absent: every operation then reports the
/// disabled / not-initialized state instead of reaching the network.
pub struct SheetSync {
    sink: Option<Arc<dyn SheetSink>>,
    timeout: Duration,
    timezone: Tz,
    /// Appends spawned by [`SheetSync::dispatch`] that have not finished yet.
    in_flight: TaskTracker,
}

impl SheetSync {
    /// Build the adapter from configuration, connecting to Google Sheets when
    /// credentials are present.
    pub fn from_config(cfg: &SheetsConfig) -> Result<Self, SheetsError> {
        let sink: Option<Arc<dyn SheetSink>> = match &cfg.credentials {
            Some(creds) => Some(Arc::new(GoogleSheetsClient::new(cfg, creds.clone())?)),
            None => None,
        };
        Ok(Self {
            sink,
            timeout: cfg.timeout(),
            timezone: cfg.timezone,
            in_flight: TaskTracker::new(),
        })
    }

    pub fn disabled() -> Self {
        Self {
            sink: None,
            timeout: Duration::from_millis(DEFAULT_SHEETS_TIMEOUT_MS),
            timezone: DEFAULT_SHEETS_TIMEZONE,
            in_flight: TaskTracker::new(),
        }
    }

    pub fn with_sink(sink: Arc<dyn SheetSink>, timeout: Duration, timezone: Tz) -> Self {
        Self {
            sink: Some(sink),
            timeout,
            timezone,
            in_flight: TaskTracker::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Append `lead` to the sheet. Never returns an error; failures are
    /// folded into [`SyncOutcome::Failed`].
    pub async fn sync(&self, lead: &Lead) -> SyncOutcome {
        let sink = match self.sink() {
            Ok(sink) => sink,
            Err(_) => return SyncOutcome::Disabled,
        };
        let row = sheet_row(lead, self.timezone);
        match self.bounded(sink.append_row(row)).await {
            Ok(receipt) => SyncOutcome::Appended(receipt),
            Err(e) => SyncOutcome::Failed(e),
        }
    }

    /// Mirror `lead` on a background task and log the outcome.
    ///
    /// The caller is not expected to await the handle; it is returned so tests
    /// can observe completion. [`SheetSync::drain`] waits for every dispatched
    /// task.
    pub fn dispatch(self: &Arc<Self>, lead: Arc<Lead>) -> JoinHandle<SyncOutcome> {
        let this = Arc::clone(self);
        self.in_flight.spawn(async move {
            let outcome = this.sync(&lead).await;
            match &outcome {
                SyncOutcome::Appended(receipt) => info!(
                    lead_id = lead.id,
                    updated_range = %receipt.updated_range,
                    updated_rows = receipt.updated_rows,
                    "Lead synced to Google Sheets"
                ),
                SyncOutcome::Disabled => {
                    debug!(lead_id = lead.id, "Google Sheets sync disabled; skipping")
                }
                SyncOutcome::Failed(e) => warn!(
                    lead_id = lead.id,
                    error = %e,
                    "Failed to sync lead to Google Sheets"
                ),
            }
            outcome
        })
    }

    /// Number of dispatched appends still running.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Wait up to `limit` for every dispatched append to finish.
    ///
    /// Returns `false` when some were still running at the deadline; those are
    /// logged and abandoned. Tasks dispatched after this call are still
    /// tracked by the next one.
    pub async fn drain(&self, limit: Duration) -> bool {
        if self.in_flight.is_empty() {
            return true;
        }
        info!(pending = self.in_flight.len(), "Waiting for Google Sheets sync to finish");
        self.in_flight.close();
        let finished = tokio::time::timeout(limit, self.in_flight.wait())
            .await
            .is_ok();
        self.in_flight.reopen();
        if !finished {
            warn!(
                pending = self.in_flight.len(),
                "Google Sheets sync still running at shutdown; rows not written"
            );
        }
        finished
    }

    /// Overwrite row 1 with the column titles and style it. Safe to repeat.
    pub async fn ensure_headers(&self) -> Result<(), SheetsError> {
        let sink = self.sink()?;
        self.bounded(sink.write_headers(&SHEET_HEADERS)).await
    }

    /// `true` when the spreadsheet is reachable with the configured
    /// credentials. Errors are logged, never returned.
    pub async fn test_connection(&self) -> bool {
        let Ok(sink) = self.sink() else {
            return false;
        };
        match self.bounded(sink.spreadsheet_title()).await {
            Ok(title) => {
                info!(title = %title, "Connected to spreadsheet");
                true
            }
            Err(e) => {
                warn!(error = %e, "Google Sheets connection test failed");
                false
            }
        }
    }

    fn sink(&self) -> Result<&Arc<dyn SheetSink>, SheetsError> {
        self.sink.as_ref().ok_or(SheetsError::NotInitialized)
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, SheetsError>
    where
        F: Future<Output = Result<T, SheetsError>>,
    {
        tokio::time::timeout(self.timeout, fut)
            .await
            .unwrap_or(Err(SheetsError::Timeout(self.timeout)))
    }
}
