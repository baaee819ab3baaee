//! Integration tests for the status endpoints and general HTTP behaviour.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, body_text, build_test_app, get, test_config, FakeProvider};
use tower::ServiceExt;

fn app(root: &std::path::Path) -> axum::Router {
    build_test_app(test_config(root), Arc::new(FakeProvider::instant())).0
}

// ---------------------------------------------------------------------------
// Test: GET /health returns 200 with expected JSON fields
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_returns_ok_with_json() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let response = get(app(tmp.path()), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

// ---------------------------------------------------------------------------
// Test: GET /status reports the server as running with no runs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn status_reports_running() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let response = get(app(tmp.path()), "/status").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "running");
    assert_eq!(json["active_runs"], 0);
}

// ---------------------------------------------------------------------------
// Test: favicon requests get an empty 204
// ---------------------------------------------------------------------------

#[tokio::test]
async fn favicon_returns_no_content() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let response = get(app(tmp.path()), "/favicon.ico").await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(body_text(response).await.is_empty());
}

// ---------------------------------------------------------------------------
// Test: unrouted paths are served from the static directory
// ---------------------------------------------------------------------------

#[tokio::test]
async fn static_files_are_served_with_index_at_root() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let static_dir = tmp.path().join("static");
    std::fs::create_dir_all(&static_dir).unwrap();
    std::fs::write(static_dir.join("index.html"), "<h1>generator</h1>").unwrap();
    std::fs::write(static_dir.join("app.js"), "console.log('hi')").unwrap();

    let root = get(app(tmp.path()), "/").await;
    assert_eq!(root.status(), StatusCode::OK);
    assert_eq!(body_text(root).await, "<h1>generator</h1>");

    let script = get(app(tmp.path()), "/app.js").await;
    assert_eq!(script.status(), StatusCode::OK);
    assert_eq!(body_text(script).await, "console.log('hi')");
}

// ---------------------------------------------------------------------------
// Test: dotfiles and key files in the static directory are never served
// ---------------------------------------------------------------------------

#[tokio::test]
async fn private_files_in_static_dir_return_404() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let static_dir = tmp.path().join("static");
    std::fs::create_dir_all(&static_dir).unwrap();
    std::fs::write(static_dir.join(".env"), "GOOGLE_ACCESS_TOKEN=secret").unwrap();
    std::fs::write(static_dir.join("service-account.json"), r#"{"private_key":"PK"}"#).unwrap();

    for uri in ["/.env", "/%2Eenv", "/service-account.json"] {
        let response = get(app(tmp.path()), uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        assert!(!body_text(response).await.contains("secret"), "{uri}");
    }
}

// ---------------------------------------------------------------------------
// Test: unknown paths return 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let response = get(app(tmp.path()), "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let response = get(app(tmp.path()), "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

// ---------------------------------------------------------------------------
// Test: CORS allows any origin to GET
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cors_preflight_allows_any_origin() {
    let tmp = tempfile::tempdir().expect("tempdir");

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/generate")
        .header("Origin", "http://example.com")
        .header("Access-Control-Request-Method", "GET")
        .body(Body::empty())
        .unwrap();

    let response = app(tmp.path()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    let allow_methods = headers["access-control-allow-methods"].to_str().unwrap();
    assert!(allow_methods.contains("GET"));
}
