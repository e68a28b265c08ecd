use std::time::Duration;

use chrono_tz::Tz;

/// Spreadsheet targeted when `GOOGLE_SPREADSHEET_ID` is unset.
pub const DEFAULT_SPREADSHEET_ID: &str = "14m4nZQ4Rs0sbC8Q75cPcSFR61MmHijII1Vds12YObWY";
pub const DEFAULT_SHEET_NAME: &str = "Website";
pub const DEFAULT_SHEETS_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_SHEETS_TIMEZONE: Tz = chrono_tz::Asia::Kolkata;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<String>,
    pub sheets: SheetsConfig,
}

/// Target and credentials for the Google Sheets mirror.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    /// `None` when any of the three OAuth2 variables is missing; sync is then
    /// disabled instead of failing startup.
    pub credentials: Option<GoogleCredentials>,
    pub spreadsheet_id: String,
    pub sheet_name: String,
    pub timeout_ms: u64,
    /// Zone used for the timestamp column of mirrored rows.
    pub timezone: Tz,
}

#[derive(Clone, PartialEq)]
pub struct GoogleCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

// Keep secrets out of logs.
impl std::fmt::Debug for GoogleCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source.
    ///
    /// `from_env` delegates here; tests pass a closure over a fixed map so they
    /// never touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let credentials = match (
            non_empty("GOOGLE_CLIENT_ID"),
            non_empty("GOOGLE_CLIENT_SECRET"),
            non_empty("GOOGLE_REFRESH_TOKEN"),
        ) {
            (Some(client_id), Some(client_secret), Some(refresh_token)) => {
                Some(GoogleCredentials {
                    client_id,
                    client_secret,
                    refresh_token,
                })
            }
            _ => None,
        };

        Ok(Self {
            port: non_empty("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .trim()
                .parse()
                .map_err(|e| format!("invalid port: {e}"))?,
            cors_origins: non_empty("LEADCAP_CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            sheets: SheetsConfig {
                credentials,
                spreadsheet_id: non_empty("GOOGLE_SPREADSHEET_ID")
                    .unwrap_or_else(|| DEFAULT_SPREADSHEET_ID.to_string()),
                sheet_name: non_empty("GOOGLE_SHEET_NAME")
                    .unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string()),
                timeout_ms: non_empty("LEADCAP_SHEETS_TIMEOUT_MS")
                    .map(|v| {
                        v.trim()
                            .parse()
                            .map_err(|e| format!("invalid LEADCAP_SHEETS_TIMEOUT_MS: {e}"))
                    })
                    .transpose()?
                    .unwrap_or(DEFAULT_SHEETS_TIMEOUT_MS),
                timezone: non_empty("LEADCAP_SHEETS_TIMEZONE")
                    .map(|v| {
                        v.trim()
                            .parse::<Tz>()
                            .map_err(|_| format!("invalid LEADCAP_SHEETS_TIMEZONE: {v}"))
                    })
                    .transpose()?
                    .unwrap_or(DEFAULT_SHEETS_TIMEZONE),
            },
        })
    }
}

impl SheetsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn is_enabled(&self) -> bool {
        self.credentials.is_some()
    }
}
