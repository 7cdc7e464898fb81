mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use common::ArtifactDir;
use medrisk::{
    api::{create_router, AppState},
    ReferenceData, ServiceContext,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn ready_app(dir: &ArtifactDir) -> Router {
    let ctx = ServiceContext::load(&dir.config()).expect("load context");
    create_router(AppState::new(Arc::new(ctx)))
}

fn unavailable_app() -> Router {
    let ctx = ServiceContext::unavailable("model artifact missing", ReferenceData::empty());
    create_router(AppState::new(Arc::new(ctx)))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("build request")
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.expect("router response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    (status, body.to_vec())
}

async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, request).await;
    let value = serde_json::from_slice(&body).expect("json body");
    (status, value)
}

#[tokio::test]
async fn root_reports_running() {
    let dir = ArtifactDir::standard();
    let app = ready_app(&dir);

    let (status, body) = send_json(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Disease prediction backend is running."}));
}

#[tokio::test]
async fn predict_returns_focus_and_top_diseases() {
    let dir = ArtifactDir::standard();
    let app = ready_app(&dir);

    let request = post_json("/predict", json!({"symptoms": ["fever"]}));
    let (status, body) = send_json(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["focus_diseases"],
        json!([{"disease": "B", "confidence": 0.75, "risk": "High"}])
    );
    assert_eq!(
        body["top_diseases"],
        json!([
            {"disease": "B", "confidence": 0.75},
            {"disease": "A", "confidence": 0.2},
            {"disease": "C", "confidence": 0.05}
        ])
    );
    assert_eq!(body["top_disease_info"]["description"], "Description of B");
}

#[tokio::test]
async fn predict_vector_returns_single_label() {
    let dir = ArtifactDir::standard();
    let app = ready_app(&dir);

    let (status, body) =
        send_json(&app, post_json("/predict/vector", json!({"symptoms": [0, 1, 0]}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"prediction": "B"}));

    let (status, body) =
        send_json(&app, post_json("/predict/label", json!({"symptoms": []}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"prediction": "A"}));

    let (status, body) = send_json(
        &app,
        post_json("/predict/vector/report", json!({"symptoms": [0, 1, 0]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["top_diseases"][0]["disease"], "B");
}

#[tokio::test]
async fn malformed_vector_is_unprocessable() {
    let dir = ArtifactDir::standard();
    let app = ready_app(&dir);

    for symptoms in [json!([0, 1]), json!([0, 1, 5])] {
        let (status, body) =
            send_json(&app, post_json("/predict/vector", json!({ "symptoms": symptoms }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn unparseable_body_keeps_extractor_status() {
    let dir = ArtifactDir::standard();
    let app = ready_app(&dir);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .expect("build request");
    let (status, body) = send_json(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = send_json(&app, post_json("/predict", json!({"symptoms": "fever"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn unavailable_model_rejects_predictions() {
    let app = unavailable_app();

    let request = post_json("/predict", json!({"symptoms": ["fever"]}));
    let (status, body) = send_json(&app, request).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let message = body["error"].as_str().expect("error message");
    assert!(message.contains("model artifact missing"));
    assert!(body.get("focus_diseases").is_none());

    let (status, _) =
        send_json(&app, post_json("/predict/vector", json!({"symptoms": [0, 1, 0]}))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, _) = send(&app, get("/readyz")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, _) = send(&app, get("/healthz")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_json(&app, get("/health")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");
}

#[tokio::test]
async fn catalogs_and_disease_lookup() {
    let dir = ArtifactDir::standard();
    let app = ready_app(&dir);

    let (status, body) = send_json(&app, get("/symptoms")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[1], json!({"id": "fever", "display_name": "Fever"}));

    let (status, body) = send_json(&app, get("/classes")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["A", "B", "C"]));

    let (status, body) = send_json(&app, get("/diseases/B")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["precautions"], json!(["rest", "fluids"]));

    let (status, body) = send_json(&app, get("/diseases/Z")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn metrics_count_requests_and_outcomes() {
    let dir = ArtifactDir::standard();
    let app = ready_app(&dir);

    send(&app, post_json("/predict", json!({"symptoms": ["fever"]}))).await;
    send(&app, post_json("/predict/vector", json!({"symptoms": [1]}))).await;

    let (status, body) = send(&app, get("/metrics")).await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body).expect("utf-8 metrics");
    assert!(text.contains("medrisk_up 1"));
    assert!(text.contains("medrisk_requests_total 2"));
    assert!(text.contains("medrisk_predictions_total 1"));
    assert!(text.contains("medrisk_validation_errors_total 1"));
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let dir = ArtifactDir::standard();
    let app = ready_app(&dir);

    let request = Request::builder()
        .method(Method::GET)
        .uri("/")
        .header(header::ORIGIN, "http://localhost:8501")
        .body(Body::empty())
        .expect("build request");
    let response = app.oneshot(request).await.expect("router response");
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
