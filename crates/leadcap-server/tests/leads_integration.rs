/// BDD integration tests for lead capture, listing and the attribution views.
mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{get, json_body, post_json, setup, submit};

// ============================================================
// BDD: N submissions list back as N leads in order with unique ids
// ============================================================
#[tokio::test]
async fn test_leads_list_in_submission_order_with_unique_ids() {
    let (_state, app) = setup();

    let mut ids = Vec::new();
    for name in ["Ann", "Bob", "Cy", "Dee", "Eve"] {
        ids.push(submit(&app, json!({ "firstName": name })).await);
    }

    let response = get(&app, "/api/leads").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    let leads = json.as_array().expect("array");

    assert_eq!(leads.len(), 5);
    let names: Vec<&str> = leads
        .iter()
        .map(|l| l["firstName"].as_str().unwrap_or_default())
        .collect();
    assert_eq!(names, vec!["Ann", "Bob", "Cy", "Dee", "Eve"]);

    let listed_ids: Vec<i64> = leads.iter().filter_map(|l| l["id"].as_i64()).collect();
    assert_eq!(listed_ids, ids);
    let mut unique = listed_ids.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), 5);
}

// ============================================================
// BDD: Empty submission yields generated id/timestamp and empty strings
// ============================================================
#[tokio::test]
async fn test_empty_submission_is_captured_with_blank_fields() {
    let (_state, app) = setup();
    let id = submit(&app, json!({})).await;

    let json = json_body(get(&app, "/api/leads").await).await;
    let leads = json.as_array().expect("array");
    assert_eq!(leads.len(), 1);

    let lead = leads[0].as_object().expect("object");
    assert_eq!(lead["id"], id);
    assert!(lead["timestamp"]
        .as_str()
        .is_some_and(|ts| ts.ends_with('Z') && ts.len() == 24));
    for (key, value) in lead {
        if key != "id" && key != "timestamp" {
            assert_eq!(value, "", "{key} should be empty");
        }
    }
}

// ============================================================
// BDD: Unknown fields are passed through
// ============================================================
#[tokio::test]
async fn test_unknown_fields_are_preserved() {
    let (_state, app) = setup();
    submit(
        &app,
        json!({ "firstName": "Ann", "promo_code": "YOGA10", "consent": true }),
    )
    .await;

    let json = json_body(get(&app, "/api/leads").await).await;
    assert_eq!(json[0]["promo_code"], "YOGA10");
    assert_eq!(json[0]["consent"], true);
}

// ============================================================
// BDD: Non-object body is rejected with a JSON error
// ============================================================
#[tokio::test]
async fn test_non_object_body_returns_400() {
    let (state, app) = setup();

    let response = post_json(&app, "/api/leads", &json!(["not", "an", "object"])).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "bad_request");
    assert!(json["error"].is_string());

    assert!(state.leads.is_empty().await);
}

#[tokio::test]
async fn test_malformed_json_returns_400() {
    let (_state, app) = setup();
    let request = Request::builder()
        .method("POST")
        .uri("/api/leads")
        .header("content-type", "application/json")
        .body(Body::from("{\"firstName\": "))
        .expect("build request");
    let response = app.clone().oneshot(request).await.expect("request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["success"], false);
}

// ============================================================
// BDD: Campaign stats freeze source/medium from the first entrant
// ============================================================
#[tokio::test]
async fn test_campaign_stats_scenario_spring() {
    let (_state, app) = setup();
    submit(
        &app,
        json!({
            "firstName": "Ann", "lastName": "Lee", "utm_campaign": "spring",
            "utm_source": "google", "gclid": "xyz"
        }),
    )
    .await;
    submit(
        &app,
        json!({ "firstName": "Bob", "lastName": "Kim", "utm_campaign": "spring" }),
    )
    .await;

    let response = get(&app, "/api/campaigns/stats").await;
    assert_eq!(response.status(), StatusCode::OK);
    let stats = json_body(response).await;
    let stats = stats.as_array().expect("array");

    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0]["campaign"], "spring");
    assert_eq!(stats[0]["source"], "google");
    assert_eq!(stats[0]["medium"], "Unknown");
    assert_eq!(stats[0]["count"], 2);
    assert_eq!(stats[0]["leads"][0]["name"], "Ann Lee");
    assert_eq!(stats[0]["leads"][1]["name"], "Bob Kim");
}

#[tokio::test]
async fn test_campaign_stats_groups_missing_campaign_and_is_idempotent() {
    let (_state, app) = setup();
    submit(&app, json!({ "firstName": "Ann" })).await;
    submit(&app, json!({ "utm_campaign": "fall", "utm_medium": "email" })).await;
    submit(&app, json!({ "utm_campaign": "" })).await;

    let first: Value = json_body(get(&app, "/api/campaigns/stats").await).await;
    let second: Value = json_body(get(&app, "/api/campaigns/stats").await).await;
    assert_eq!(first, second);

    let stats = first.as_array().expect("array");
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0]["campaign"], "No Campaign");
    assert_eq!(stats[0]["count"], 2);
    assert_eq!(stats[1]["campaign"], "fall");
    assert_eq!(stats[1]["source"], "Unknown");
    assert_eq!(stats[1]["medium"], "email");
}

// ============================================================
// BDD: Source filter matches click ids for google/facebook
// ============================================================
#[tokio::test]
async fn test_source_filter_matches_gclid_for_google() {
    let (_state, app) = setup();
    let gclid_only = submit(&app, json!({ "gclid": "abc" })).await;
    let utm_google = submit(&app, json!({ "utm_source": "Google" })).await;
    submit(&app, json!({ "utm_source": "newsletter" })).await;

    let json = json_body(get(&app, "/api/leads/source/google").await).await;
    let ids: Vec<i64> = json
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|l| l["id"].as_i64())
        .collect();
    assert_eq!(ids, vec![gclid_only, utm_google]);

    let by_click_id = json_body(get(&app, "/api/leads/source/abc").await).await;
    assert_eq!(by_click_id.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_source_filter_matches_fbclid_for_facebook() {
    let (_state, app) = setup();
    let fb = submit(&app, json!({ "fbclid": "fb.1.123" })).await;
    submit(&app, json!({ "gclid": "g" })).await;

    let json = json_body(get(&app, "/api/leads/source/FaceBook").await).await;
    let leads = json.as_array().expect("array");
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0]["id"], fb);
}

// ============================================================
// BDD: Campaign filter is exact and case-sensitive
// ============================================================
#[tokio::test]
async fn test_campaign_filter_is_exact() {
    let (_state, app) = setup();
    let spring = submit(&app, json!({ "utm_campaign": "spring sale" })).await;
    submit(&app, json!({ "utm_campaign": "Spring Sale" })).await;

    let json = json_body(get(&app, "/api/leads/campaign/spring%20sale").await).await;
    let leads = json.as_array().expect("array");
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0]["id"], spring);
}
