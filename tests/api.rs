//! HTTP surface tests for the reference and route endpoints.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, build_test_app, get, send};
use serde_json::json;

#[tokio::test]
async fn health_returns_ok_with_request_id() {
    let app = build_test_app();
    let response = get(&app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let request_id = response.headers().get("x-request-id").unwrap().to_str().unwrap().to_string();
    assert_eq!(request_id.len(), 36);

    assert_eq!(body_json(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn incoming_request_id_is_echoed() {
    let app = build_test_app();
    let request = axum::http::Request::builder()
        .uri("/health")
        .header("x-request-id", "trace-abc-123")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "trace-abc-123");
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = build_test_app();
    let response = get(&app, "/api/vehicles").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reads_report_the_failing_entity_when_database_is_down() {
    let app = build_test_app();

    for (path, message) in [
        ("/api/employees", "Failed to fetch employees"),
        ("/api/job-positions", "Failed to fetch job positions"),
        ("/api/principals", "Failed to fetch principals"),
        ("/api/roles", "Failed to fetch roles"),
        ("/api/routes", "Failed to fetch routes"),
        ("/api/stores?search=Market", "Failed to fetch stores"),
        ("/api/warehouses", "Failed to fetch warehouses"),
    ] {
        let response = get(&app, path).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{}", path);

        let body = body_json(response).await;
        assert_eq!(body["error"], message, "{}", path);
        assert!(body["details"].is_string(), "{}", path);
    }
}

#[tokio::test]
async fn create_route_failure_is_reported() {
    let app = build_test_app();
    let response = send(
        &app,
        Method::POST,
        "/api/routes",
        Some(json!({ "name": "North Loop", "code": "ADM123456XYZ", "customers": [] })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Failed to create route");
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn dashboard_failure_is_reported() {
    let app = build_test_app();
    let response = get(&app, "/api/dashboard").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "Failed to fetch dashboard");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = build_test_app();
    let response = get(&app, "/api-docs/openapi.json").await;

    assert_eq!(response.status(), StatusCode::OK);
    let doc = body_json(response).await;
    assert!(doc["paths"]["/api/wizard/{id}/schedule/assign"].is_object());
    assert!(doc["paths"]["/api/routes"]["post"].is_object());
}
