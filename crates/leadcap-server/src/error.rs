use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use leadcap_sheets::SheetsError;

/// Application-level errors that map directly to HTTP responses.
///
/// Every failure body has the same shape:
/// `{ "success": false, "error": "<message>", "code": "<code>" }`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Sheets(#[from] SheetsError),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Sheets(e) => {
                let status = sheets_status(e);
                if status.is_server_error() {
                    tracing::warn!(error = %e, "Google Sheets admin call failed");
                }
                (status, e.code(), e.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error".to_string(),
                )
            }
        };

        (
            status,
            Json(json!({
                "success": false,
                "error": message,
                "code": code
            })),
        )
            .into_response()
    }
}

fn sheets_status(e: &SheetsError) -> StatusCode {
    match e {
        SheetsError::NotInitialized => StatusCode::SERVICE_UNAVAILABLE,
        SheetsError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        SheetsError::Http(_)
        | SheetsError::Auth { .. }
        | SheetsError::Api { .. }
        | SheetsError::SheetNotFound(_)
        | SheetsError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
        SheetsError::InvalidUrl(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn not_initialized_is_service_unavailable() {
        let resp = AppError::Sheets(SheetsError::NotInitialized).into_response();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn upstream_failures_are_bad_gateway() {
        let err = SheetsError::Api {
            status: 403,
            message: "denied".to_string(),
        };
        assert_eq!(sheets_status(&err), StatusCode::BAD_GATEWAY);
        assert_eq!(
            sheets_status(&SheetsError::Timeout(Duration::from_secs(5))),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[test]
    fn bad_request_is_400() {
        let resp = AppError::BadRequest("nope".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
