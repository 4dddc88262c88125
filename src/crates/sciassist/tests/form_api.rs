//! Form router tests driven through `tower::ServiceExt::oneshot`

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use common::{MockLookup, MockModel};
use sciassist::api::create_router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn router(model: Arc<MockModel>, lookup: Arc<MockLookup>) -> Router {
    create_router(Arc::new(common::dispatcher(model, lookup)))
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_form_page_is_served() {
    let app = router(MockModel::replying("x"), MockLookup::answering());
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let page = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(page.contains("/api/v1/query"));
    assert!(page.contains("/api/v1/debug"));
    assert!(page.contains("/api/v1/visualize"));
}

#[tokio::test]
async fn test_health() {
    let app = router(MockModel::replying("x"), MockLookup::answering());
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["deploy_enabled"], false);
}

#[tokio::test]
async fn test_query_code_route() {
    let model = MockModel::replying("Plot[Sin[x], {x, 0, Pi}]");
    let app = router(model.clone(), MockLookup::answering());

    let (status, body) = post_json(app, "/api/v1/query", json!({"query": "Wolfram plot of sin"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"success": true, "data": {"route": "code_gen", "text": "Plot[Sin[x], {x, 0, Pi}]"}})
    );
    assert_eq!(model.calls(), vec!["Generate code for: Wolfram plot of sin"]);
}

#[tokio::test]
async fn test_query_lookup_route() {
    let lookup = MockLookup::answering();
    let app = router(MockModel::replying("x"), lookup.clone());

    let (status, body) = post_json(app, "/api/v1/query", json!({"query": "boiling point of ethanol"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["route"], "lookup");
    assert_eq!(body["data"]["text"], "answer to boiling point of ethanol");
    assert_eq!(lookup.calls(), vec!["boiling point of ethanol"]);
}

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway() {
    let app = router(MockModel::replying("x"), MockLookup::failing("backend down"));

    let (status, body) = post_json(app, "/api/v1/query", json!({"query": "pi"})).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "UPSTREAM_ERROR");
    assert_eq!(body["error"], "ComputationError");
    assert_eq!(
        body["message"],
        "Computation lookup failed: Service error 503: backend down"
    );
}

#[tokio::test]
async fn test_debug_endpoint() {
    let model = MockModel::replying("Plot[Sin[x], {x, 0, Pi}]");
    let app = router(model.clone(), MockLookup::answering());

    let (status, body) = post_json(app, "/api/v1/debug", json!({"code": "Plot[Sin[x], {x, 0, Pi}"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["code"], "Plot[Sin[x], {x, 0, Pi}]");
    assert_eq!(model.calls(), vec!["Debug the following code: Plot[Sin[x], {x, 0, Pi}"]);
}

#[tokio::test]
async fn test_debug_blank_code_is_bad_request() {
    let model = MockModel::replying("x");
    let app = router(model.clone(), MockLookup::answering());

    let (status, body) = post_json(app, "/api/v1/debug", json!({"code": "  "})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(model.calls().is_empty());
}

#[tokio::test]
async fn test_visualize_endpoint() {
    let app = router(MockModel::replying("x"), MockLookup::answering());

    let (status, body) = post_json(app, "/api/v1/visualize", json!({"data": "[1, 4, 9]"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["text"], "Visualizing: [1, 4, 9]");
}

#[tokio::test]
async fn test_missing_field_is_json_bad_request() {
    let lookup = MockLookup::answering();
    let app = router(MockModel::replying("x"), lookup.clone());

    let (status, body) = post_json(app, "/api/v1/query", json!({"q": "pi"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(body["message"].as_str().unwrap().contains("query"));
    assert!(lookup.calls().is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_json_bad_request() {
    let app = router(MockModel::replying("x"), MockLookup::answering());
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/debug")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"code\": "))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "BAD_REQUEST");
    assert_eq!(body["error"], "BadRequest");
}
