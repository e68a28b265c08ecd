use async_trait::async_trait;
use serde::Serialize;

use crate::error::SheetsError;

/// Result of a successful row append, as reported by the sheet service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppendReceipt {
    pub updated_range: String,
    pub updated_rows: u64,
}

/// Spreadsheet operations the sync adapter depends on.
///
/// Production uses [`crate::GoogleSheetsClient`]; tests can substitute an
/// in-memory or deliberately failing implementation behind the same
/// `Arc<dyn SheetSink>`.
#[async_trait]
pub trait SheetSink: Send + Sync + 'static {
    /// Append one row below the last populated row of the target tab.
    async fn append_row(&self, row: Vec<String>) -> Result<AppendReceipt, SheetsError>;

    /// Overwrite row 1 with `headers` and style it as a header row.
    async fn write_headers(&self, headers: &[&str]) -> Result<(), SheetsError>;

    /// Title of the target spreadsheet. Used as a reachability check.
    async fn spreadsheet_title(&self) -> Result<String, SheetsError>;
}
