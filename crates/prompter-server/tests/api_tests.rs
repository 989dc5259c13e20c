//! Integration tests for the prompt API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. This validates handler logic and routing
//! without needing a live network connection.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use prompter_core::Broker;
use prompter_server::router::build_router;
use prompter_server::state::AppState;
use serde_json::{Value, json};
use tower::ServiceExt;

fn make_router() -> (Router, Arc<Broker>) {
    let broker = Arc::new(Broker::new().unwrap());
    let state = Arc::new(AppState::new(Arc::clone(&broker)));
    (build_router(state), broker)
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn submit(router: &Router, body: &Value) -> String {
    let response = router.clone().oneshot(post_json("/prompt", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    json["id"].as_str().unwrap().to_owned()
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_submit_returns_id() {
    let (router, broker) = make_router();

    let response = router
        .clone()
        .oneshot(post_json("/prompt", &json!({"message": "Proceed?", "options": ["y", "n"]})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );
    let json = body_to_json(response.into_body()).await;
    let id = json["id"].as_str().unwrap();

    let stored = broker.get(id).await.unwrap();
    assert_eq!(stored.message, "Proceed?");
    assert_eq!(stored.options, Some(vec![String::from("y"), String::from("n")]));
}

#[tokio::test]
async fn test_submit_coerces_missing_fields() {
    let (router, broker) = make_router();

    let response = router
        .clone()
        .oneshot(Request::post("/prompt").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let id = body_to_json(response.into_body()).await["id"]
        .as_str()
        .unwrap()
        .to_owned();

    let stored = broker.get(&id).await.unwrap();
    assert_eq!(stored.message, "");
    assert_eq!(stored.options, None);
}

#[tokio::test]
async fn test_submit_malformed_json_is_bad_request() {
    let (router, broker) = make_router();

    let response = router
        .oneshot(Request::post("/prompt").body(Body::from("{nope")).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(broker.list().await.is_empty());
}

#[tokio::test]
async fn test_held_wait_returns_answer() {
    let (router, _broker) = make_router();
    let id = submit(&router, &json!({"message": "Proceed?", "options": ["y", "n"]})).await;

    let waiting = tokio::spawn(router.clone().oneshot(get(&format!("/wait?id={id}"))));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!waiting.is_finished());

    let response = router
        .clone()
        .oneshot(post_json("/answer", &json!({"id": id, "answer": "y"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_json(response.into_body()).await, json!({"ok": true}));

    let held = tokio::time::timeout(Duration::from_secs(5), waiting)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(held.status(), StatusCode::OK);
    assert_eq!(
        body_to_json(held.into_body()).await,
        json!({"id": id, "answer": "y"})
    );
}

#[tokio::test]
async fn test_answer_unknown_id_is_404() {
    let (router, _broker) = make_router();

    let response = router
        .oneshot(post_json(
            "/answer",
            &json!({"id": "00000000-0000-0000-0000-000000000000", "answer": "y"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_to_string(response.into_body()).await, "Unknown id");
}

#[tokio::test]
async fn test_second_answer_reports_ok_but_keeps_first() {
    let (router, _broker) = make_router();
    let id = submit(&router, &json!({"message": "Proceed?"})).await;

    for text in ["y", "n"] {
        let response = router
            .clone()
            .oneshot(post_json("/answer", &json!({"id": id, "answer": text})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_to_json(response.into_body()).await, json!({"ok": true}));
    }

    let response = router
        .oneshot(get(&format!("/wait?id={id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_json(response.into_body()).await["answer"], "y");
}

#[tokio::test]
async fn test_wait_unknown_id_is_404_immediately() {
    let (router, _broker) = make_router();

    let response = tokio::time::timeout(
        Duration::from_secs(1),
        router.clone().oneshot(get("/wait?id=missing")),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = router.oneshot(get("/wait")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_id_must_match_exactly() {
    let (router, broker) = make_router();
    let id = submit(&router, &json!({"message": "Proceed?"})).await;
    let upper = id.to_uppercase();

    let response = router
        .clone()
        .oneshot(post_json("/answer", &json!({"id": upper, "answer": "y"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(broker.get(&id).await.unwrap().answer, None);

    let response = router
        .clone()
        .oneshot(get(&format!("/wait?id={upper}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = router
        .clone()
        .oneshot(post_json("/answer", &json!({"id": id, "answer": "y"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(get(&format!("/wait?id={id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_to_json(response.into_body()).await,
        json!({"id": id, "answer": "y"})
    );
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (router, _broker) = make_router();

    let response = router.clone().oneshot(get("/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_to_string(response.into_body()).await, "Not found");

    // Known path, wrong method.
    let response = router.oneshot(get("/prompt")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_to_string(response.into_body()).await, "Not found");
}

#[tokio::test]
async fn test_panel_page_is_html() {
    let (router, _broker) = make_router();

    let response = router.oneshot(get("/panel")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_to_string(response.into_body()).await;
    assert!(html.contains("/panel/ws"));
}

#[tokio::test]
async fn test_shutdown_releases_held_wait() {
    let (router, broker) = make_router();
    let id = submit(&router, &json!({"message": "never answered"})).await;

    let waiting = tokio::spawn(router.clone().oneshot(get(&format!("/wait?id={id}"))));
    tokio::time::sleep(Duration::from_millis(50)).await;

    broker.shutdown().await;

    let response = tokio::time::timeout(Duration::from_secs(5), waiting)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
