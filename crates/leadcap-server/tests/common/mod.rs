#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use leadcap_core::config::{
    Config, SheetsConfig, DEFAULT_SHEETS_TIMEZONE, DEFAULT_SHEET_NAME, DEFAULT_SPREADSHEET_ID,
};
use leadcap_server::app::build_app;
use leadcap_server::state::AppState;
use leadcap_sheets::SheetSync;

pub fn test_config() -> Config {
    Config {
        port: 0,
        cors_origins: vec![],
        sheets: SheetsConfig {
            credentials: None,
            spreadsheet_id: DEFAULT_SPREADSHEET_ID.to_string(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            timeout_ms: 1000,
            timezone: DEFAULT_SHEETS_TIMEZONE,
        },
    }
}

pub fn setup_with(sheets: SheetSync) -> (Arc<AppState>, axum::Router) {
    let state = Arc::new(AppState::new(test_config(), sheets));
    let app = build_app(Arc::clone(&state));
    (state, app)
}

pub fn setup() -> (Arc<AppState>, axum::Router) {
    setup_with(SheetSync::disabled())
}

pub async fn json_body(response: axum::http::Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("parse JSON")
}

pub async fn text_body(response: axum::http::Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf8")
}

pub async fn get(app: &axum::Router, uri: &str) -> axum::http::Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build request");
    app.clone().oneshot(request).await.expect("request")
}

pub async fn post_json(app: &axum::Router, uri: &str, body: &Value) -> axum::http::Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request");
    app.clone().oneshot(request).await.expect("request")
}

/// Submit a lead and return its id.
pub async fn submit(app: &axum::Router, body: Value) -> i64 {
    let response = post_json(app, "/api/leads", &body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["success"], true);
    json["id"].as_i64().expect("id")
}
