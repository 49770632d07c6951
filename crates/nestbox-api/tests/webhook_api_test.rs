//! Webhook API endpoint tests.
//!
//! Exercises the full router over the in-memory store: webhook creation,
//! descriptor fetch, event capture through the ingestion route, event
//! listing, and error envelope shapes for bad input.

use std::{sync::Arc, time::Duration};

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use nestbox_api::{create_router, AppState};
use nestbox_core::{MemoryStore, ServiceConfig, TestClock, WebhookService};
use serde_json::{json, Value};
use tower::ServiceExt;

const BASE_URL: &str = "http://localhost:8080/api/v1/webhook/updatewebhook";

fn test_router() -> Router {
    let store = Arc::new(MemoryStore::new());
    let config = ServiceConfig::new(BASE_URL, Duration::from_secs(3600));
    let start = Utc.with_ymd_and_hms(2024, 5, 14, 12, 0, 0).unwrap();
    let clock = Arc::new(TestClock::at(start));
    let service = Arc::new(WebhookService::with_clock(store.clone(), config, clock));
    create_router(AppState::new(service, store), Duration::from_secs(30))
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body should be valid JSON")
}

async fn create_webhook(app: &Router) -> Value {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/webhook/createwebhook")
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.expect("failed to make request");
    assert_eq!(response.status(), StatusCode::OK);
    json_body(response).await
}

#[tokio::test]
async fn create_webhook_returns_id_and_url() {
    let app = test_router();

    let webhook = create_webhook(&app).await;

    let id = webhook["id"].as_str().expect("id should be a string");
    let url = webhook["url"].as_str().expect("url should be a string");
    assert!(!id.is_empty());
    assert_eq!(url, format!("{BASE_URL}/{id}"));
}

#[tokio::test]
async fn get_webhook_round_trips_descriptor() {
    let app = test_router();

    let created = create_webhook(&app).await;
    let id = created["id"].as_str().unwrap();

    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/v1/webhook/getwebhook/{id}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.expect("failed to make request");

    assert_eq!(response.status(), StatusCode::OK);
    let fetched = json_body(response).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn get_unknown_webhook_returns_not_found_envelope() {
    let app = test_router();

    let request = Request::builder()
        .method("GET")
        .uri("/api/v1/webhook/getwebhook/00000000-0000-4000-8000-000000000000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.expect("failed to make request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "WEBHOOK_NOT_FOUND");
    assert!(body["error"]["message"].is_string());
}

#[tokio::test]
async fn malformed_webhook_id_returns_bad_request() {
    let app = test_router();

    for uri in [
        "/api/v1/webhook/getwebhook/not-a-uuid",
        "/api/v1/webhook/getwebhook/events/not-a-uuid",
        "/api/v1/webhook/updatewebhook/not-a-uuid",
    ] {
        let request = Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.expect("failed to make request");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri: {uri}");
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "INVALID_ID");
    }
}

#[tokio::test]
async fn captured_event_appears_in_listing() {
    let app = test_router();

    let webhook = create_webhook(&app).await;
    let id = webhook["id"].as_str().unwrap();

    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/v1/webhook/updatewebhook/{id}"))
        .header("content-type", "application/json")
        .header("x-delivery-id", "d-42")
        .body(Body::from(json!({"order": 7, "paid": true}).to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.expect("failed to make request");
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/v1/webhook/getwebhook/events/{id}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.expect("failed to make request");
    assert_eq!(response.status(), StatusCode::OK);

    let events = json_body(response).await;
    let events = events.as_array().expect("listing should be an array");
    assert_eq!(events.len(), 1);

    let event = &events[0];
    assert_eq!(event["method"], "POST");
    assert_eq!(event["data"]["order"], 7);
    assert_eq!(event["data"]["paid"], true);
    assert_eq!(event["headers"]["x-delivery-id"], "d-42");
    assert!(event["createdAt"].is_string());

    // Internal table attributes never reach the wire.
    for key in ["pk", "sk", "GSI1PK", "GSI1SK", "expiresAt"] {
        assert!(event.get(key).is_none(), "{key} leaked into the response");
    }
}

#[tokio::test]
async fn capture_accepts_any_method_and_non_json_bodies() {
    let app = test_router();

    let webhook = create_webhook(&app).await;
    let id = webhook["id"].as_str().unwrap();

    for method in ["PUT", "PATCH", "DELETE", "GET"] {
        let request = Request::builder()
            .method(method)
            .uri(format!("/api/v1/webhook/updatewebhook/{id}"))
            .body(Body::from("plain text payload"))
            .unwrap();
        let response = app.clone().oneshot(request).await.expect("failed to make request");
        assert_eq!(response.status(), StatusCode::OK, "method: {method}");
    }

    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/v1/webhook/getwebhook/events/{id}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.expect("failed to make request");
    let events = json_body(response).await;
    let events = events.as_array().unwrap();

    assert_eq!(events.len(), 4);
    for event in events {
        assert_eq!(event["data"]["rawData"], "plain text payload");
    }
}

#[tokio::test]
async fn listing_unknown_webhook_returns_empty_array() {
    let app = test_router();

    let request = Request::builder()
        .method("GET")
        .uri("/api/v1/webhook/getwebhook/events/00000000-0000-4000-8000-000000000000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.expect("failed to make request");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!([]));
}

#[tokio::test]
async fn liveness_endpoint_reports_alive() {
    let app = test_router();

    let request = Request::builder().method("GET").uri("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.expect("failed to make request");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "alive");
}

#[tokio::test]
async fn readiness_endpoint_reports_store_health() {
    let app = test_router();

    let request =
        Request::builder().method("GET").uri("/health/ready").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.expect("failed to make request");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["store"]["status"], "up");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn responses_carry_request_id_header() {
    let app = test_router();

    let request = Request::builder().method("GET").uri("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.expect("failed to make request");

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("response should carry a request id")
        .to_str()
        .unwrap();
    assert!(!request_id.is_empty());
}
