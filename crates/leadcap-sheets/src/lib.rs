//! Best-effort mirror of captured leads into a Google Sheets tab.
//!
//! [`SheetSync`] is what the server holds. It wraps an optional [`SheetSink`]
//! (the real [`GoogleSheetsClient`] in production, a fake in tests) and turns
//! every call into a bounded, logged outcome.

pub mod error;
pub mod google;
pub mod row;
pub mod sink;
pub mod sync;

pub use error::SheetsError;
pub use google::GoogleSheetsClient;
pub use sink::{AppendReceipt, SheetSink};
pub use sync::{SheetSync, SyncOutcome};
