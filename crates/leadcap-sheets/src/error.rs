use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetsError {
    /// No credentials were configured, so no client exists.
    #[error("Google Sheets API not initialized")]
    NotInitialized,

    #[error("Google Sheets call timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OAuth2 token refresh failed ({status}): {message}")]
    Auth { status: u16, message: String },

    #[error("Google Sheets API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("sheet tab not found: {0}")]
    SheetNotFound(String),

    #[error("invalid Google Sheets response: {0}")]
    InvalidResponse(String),

    #[error("invalid endpoint url: {0}")]
    InvalidUrl(String),
}

impl SheetsError {
    /// Stable machine-readable code for API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            SheetsError::NotInitialized => "sheets_not_initialized",
            SheetsError::Timeout(_) => "sheets_timeout",
            SheetsError::Http(_) => "sheets_unreachable",
            SheetsError::Auth { .. } => "sheets_auth_failed",
            SheetsError::Api { .. } => "sheets_api_error",
            SheetsError::SheetNotFound(_) => "sheet_not_found",
            SheetsError::InvalidResponse(_) => "sheets_invalid_response",
            SheetsError::InvalidUrl(_) => "sheets_invalid_url",
        }
    }
}
