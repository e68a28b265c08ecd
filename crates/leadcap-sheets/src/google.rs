//! Google Sheets v4 REST client authenticated with an OAuth2 refresh token.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{debug, info};
use url::Url;

use leadcap_core::config::{GoogleCredentials, SheetsConfig};

use crate::{
    error::SheetsError,
    row::LAST_COLUMN,
    sink::{AppendReceipt, SheetSink},
};

pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_SHEETS_API: &str = "https://sheets.googleapis.com";

/// Refresh this long before the reported expiry.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

pub struct GoogleSheetsClient {
    http: reqwest::Client,
    credentials: GoogleCredentials,
    spreadsheet_id: String,
    sheet_name: String,
    token_url: Url,
    api_base: Url,
    token: RwLock<Option<AccessToken>>,
}

struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + TOKEN_EXPIRY_MARGIN < self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Deserialize)]
struct AppendResponse {
    updates: AppendUpdates,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendUpdates {
    #[serde(default)]
    updated_range: String,
    #[serde(default)]
    updated_rows: u64,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetResponse {
    properties: SpreadsheetProperties,
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
}

impl GoogleSheetsClient {
    /// Build a client for the spreadsheet and tab named in `cfg`.
    ///
    /// The configured sheets timeout bounds every individual HTTP request.
    pub fn new(cfg: &SheetsConfig, credentials: GoogleCredentials) -> Result<Self, SheetsError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(3))
            .timeout(cfg.timeout())
            .build()?;
        Ok(Self {
            http,
            credentials,
            spreadsheet_id: cfg.spreadsheet_id.clone(),
            sheet_name: cfg.sheet_name.clone(),
            token_url: parse_url(GOOGLE_TOKEN_URL)?,
            api_base: parse_url(GOOGLE_SHEETS_API)?,
            token: RwLock::new(None),
        })
    }

    /// Point the client at different OAuth2 and Sheets endpoints.
    pub fn with_endpoints(mut self, token_url: &str, api_base: &str) -> Result<Self, SheetsError> {
        self.token_url = parse_url(token_url)?;
        self.api_base = parse_url(api_base)?;
        Ok(self)
    }

    async fn access_token(&self) -> Result<String, SheetsError> {
        {
            let cached = self.token.read().await;
            if let Some(token) = cached.as_ref().filter(|t| t.is_fresh()) {
                return Ok(token.value.clone());
            }
        }

        let mut cached = self.token.write().await;
        // Another task may have refreshed while we waited for the write lock.
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.value.clone());
        }

        let response = self
            .http
            .post(self.token_url.clone())
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(refresh_grant_body(&self.credentials))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsError::Auth {
                status: status.as_u16(),
                message: oauth_error_message(&body),
            });
        }

        let token: TokenResponse = response.json().await?;
        debug!(expires_in = token.expires_in, "Google access token refreshed");
        let value = token.access_token.clone();
        *cached = Some(AccessToken {
            value: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        });
        Ok(value)
    }

    /// `{api_base}/v4/spreadsheets/{spreadsheet_id}{suffix}` followed by `rest` segments.
    ///
    /// Segments are percent-encoded, so tab names with spaces are safe.
    fn spreadsheet_url(&self, suffix: &str, rest: &[&str]) -> Result<Url, SheetsError> {
        let mut url = self.api_base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| SheetsError::InvalidUrl(self.api_base.to_string()))?;
            segments
                .pop_if_empty()
                .push("v4")
                .push("spreadsheets")
                .push(&format!("{}{suffix}", self.spreadsheet_id));
            for segment in rest {
                segments.push(segment);
            }
        }
        Ok(url)
    }

    async fn send_json(&self, request: reqwest::RequestBuilder) -> Result<Value, SheetsError> {
        let token = self.access_token().await?;
        let response = request.bearer_auth(token).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }
        Ok(response.json().await?)
    }

    async fn spreadsheet(&self) -> Result<SpreadsheetResponse, SheetsError> {
        let mut url = self.spreadsheet_url("", &[])?;
        url.query_pairs_mut()
            .append_pair("fields", "properties.title,sheets.properties(sheetId,title)");
        let value = self.send_json(self.http.get(url)).await?;
        serde_json::from_value(value).map_err(|e| SheetsError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl SheetSink for GoogleSheetsClient {
    async fn append_row(&self, row: Vec<String>) -> Result<AppendReceipt, SheetsError> {
        let range = format!("{}!A:{LAST_COLUMN}:append", quoted_sheet_name(&self.sheet_name));
        let mut url = self.spreadsheet_url("", &["values", range.as_str()])?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED")
            .append_pair("insertDataOption", "INSERT_ROWS");

        let value = self
            .send_json(self.http.post(url).json(&json!({ "values": [row] })))
            .await?;
        let parsed: AppendResponse =
            serde_json::from_value(value).map_err(|e| SheetsError::InvalidResponse(e.to_string()))?;
        Ok(AppendReceipt {
            updated_range: parsed.updates.updated_range,
            updated_rows: parsed.updates.updated_rows,
        })
    }

    async fn write_headers(&self, headers: &[&str]) -> Result<(), SheetsError> {
        let range = format!("{}!A1:{LAST_COLUMN}1", quoted_sheet_name(&self.sheet_name));
        let mut url = self.spreadsheet_url("", &["values", range.as_str()])?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED");
        self.send_json(self.http.put(url).json(&json!({ "values": [headers] })))
            .await?;

        let sheet_id = self
            .spreadsheet()
            .await?
            .sheets
            .into_iter()
            .find(|s| s.properties.title == self.sheet_name)
            .map(|s| s.properties.sheet_id)
            .ok_or_else(|| SheetsError::SheetNotFound(self.sheet_name.clone()))?;

        let url = self.spreadsheet_url(":batchUpdate", &[])?;
        self.send_json(self.http.post(url).json(&header_format_request(sheet_id)))
            .await?;

        info!(sheet = %self.sheet_name, "Sheet headers written");
        Ok(())
    }

    async fn spreadsheet_title(&self) -> Result<String, SheetsError> {
        Ok(self.spreadsheet().await?.properties.title)
    }
}

/// Bold text on a light grey background across row 1 of `sheet_id`.
fn header_format_request(sheet_id: i64) -> Value {
    json!({
        "requests": [{
            "repeatCell": {
                "range": {
                    "sheetId": sheet_id,
                    "startRowIndex": 0,
                    "endRowIndex": 1
                },
                "cell": {
                    "userEnteredFormat": {
                        "textFormat": { "bold": true },
                        "backgroundColor": { "red": 0.9, "green": 0.9, "blue": 0.9 }
                    }
                },
                "fields": "userEnteredFormat(textFormat,backgroundColor)"
            }
        }]
    })
}

/// A1-notation sheet reference: single-quoted, embedded quotes doubled.
fn quoted_sheet_name(name: &str) -> String {
    format!("'{}'", name.replace('\'', "''"))
}

fn refresh_grant_body(credentials: &GoogleCredentials) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("client_id", &credentials.client_id)
        .append_pair("client_secret", &credentials.client_secret)
        .append_pair("refresh_token", &credentials.refresh_token)
        .append_pair("grant_type", "refresh_token")
        .finish()
}

fn parse_url(raw: &str) -> Result<Url, SheetsError> {
    Url::parse(raw).map_err(|e| SheetsError::InvalidUrl(format!("{raw}: {e}")))
}

/// `{"error": {"message": ...}}` from the Sheets API, else the raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

/// `{"error": ..., "error_description": ...}` from the token endpoint.
fn oauth_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.to_string();
    };
    match (value["error"].as_str(), value["error_description"].as_str()) {
        (Some(code), Some(desc)) => format!("{code}: {desc}"),
        (Some(code), None) => code.to_string(),
        _ => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(sheet_name: &str) -> GoogleSheetsClient {
        let cfg = SheetsConfig {
            credentials: None,
            spreadsheet_id: "abc123".to_string(),
            sheet_name: sheet_name.to_string(),
            timeout_ms: 1000,
            timezone: chrono_tz::UTC,
        };
        let creds = GoogleCredentials {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            refresh_token: "refresh".to_string(),
        };
        GoogleSheetsClient::new(&cfg, creds).expect("client")
    }

    #[test]
    fn append_url_encodes_the_tab_name() {
        let c = client("Web Leads");
        let url = c
            .spreadsheet_url("", &["values", "Web Leads!A:S:append"])
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc123/values/Web%20Leads!A:S:append"
        );
    }

    #[test]
    fn sheet_names_are_quoted_for_a1_ranges() {
        assert_eq!(quoted_sheet_name("Website"), "'Website'");
        assert_eq!(quoted_sheet_name("2024"), "'2024'");
        assert_eq!(quoted_sheet_name("Ann's Leads"), "'Ann''s Leads'");
    }

    #[test]
    fn batch_update_url_has_method_suffix() {
        let url = client("Website")
            .spreadsheet_url(":batchUpdate", &[])
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc123:batchUpdate"
        );
    }

    #[test]
    fn api_error_message_prefers_structured_message() {
        let body = r#"{"error":{"code":403,"message":"The caller does not have permission"}}"#;
        assert_eq!(api_error_message(body), "The caller does not have permission");
        assert_eq!(api_error_message("teapot"), "teapot");
    }

    #[test]
    fn oauth_error_message_combines_code_and_description() {
        let body = r#"{"error":"invalid_grant","error_description":"Token has been expired"}"#;
        assert_eq!(oauth_error_message(body), "invalid_grant: Token has been expired");
    }

    #[test]
    fn refresh_grant_is_form_encoded() {
        let creds = GoogleCredentials {
            client_id: "id 1".to_string(),
            client_secret: "s&t".to_string(),
            refresh_token: "1//r".to_string(),
        };
        assert_eq!(
            refresh_grant_body(&creds),
            "client_id=id+1&client_secret=s%26t&refresh_token=1%2F%2Fr&grant_type=refresh_token"
        );
    }

    #[test]
    fn header_format_targets_first_row_only() {
        let req = header_format_request(42);
        let range = &req["requests"][0]["repeatCell"]["range"];
        assert_eq!(range["sheetId"], 42);
        assert_eq!(range["startRowIndex"], 0);
        assert_eq!(range["endRowIndex"], 1);
    }
}
