//! Integration test: Server API endpoints

use insurance_charges::artifacts::{ArtifactPaths, InferenceContext};
use insurance_charges::error::InferenceError;
use insurance_charges::models::Regressor;
use insurance_charges::preprocessing::{Scaler, FEATURE_NAMES};
use insurance_charges::server::{create_router, AppState};
use ndarray::{Array1, Array2};
use std::sync::Arc;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn test_app() -> axum::Router {
    let paths = ArtifactPaths::new(fixture("model.json"), fixture("scaler.json"));
    let context = InferenceContext::load(&paths).unwrap();
    create_router(Arc::new(AppState::new(context)))
}

/// Regressor whose every prediction fails with internal detail attached
#[derive(Debug)]
struct BrokenModel;

impl Regressor for BrokenModel {
    fn kind(&self) -> &'static str {
        "broken"
    }

    fn n_features(&self) -> usize {
        6
    }

    fn predict(&self, _x: &Array2<f64>) -> Result<Array1<f64>, InferenceError> {
        Err(InferenceError::Worker(
            "secret internal frame 0xdeadbeef".to_string(),
        ))
    }
}

fn broken_app() -> axum::Router {
    let scaler = Scaler::new(
        FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
        vec![0.0; 6],
        vec![1.0; 6],
    )
    .unwrap();
    let context = InferenceContext::from_parts(Arc::new(BrokenModel), scaler).unwrap();
    create_router(Arc::new(AppState::new(context)))
}

async fn post_predict(body: String) -> (StatusCode, Value) {
    post_predict_to(test_app(), body).await
}

async fn post_predict_to(app: axum::Router, body: String) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/predict")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn example() -> Value {
    json!({
        "age": 25,
        "sex": "male",
        "bmi": 28.5,
        "children": 0,
        "smoker": "no",
        "region": "southeast"
    })
}

#[tokio::test]
async fn test_predict_documented_example() {
    let (status, body) = post_predict(example().to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "predicted_charges": 2286.67 }));
}

#[tokio::test]
async fn test_predict_smoker() {
    let body = json!({
        "age": 60, "sex": "female", "bmi": 35.0,
        "children": 2, "smoker": "yes", "region": "southwest"
    });
    let (status, body) = post_predict(body.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["predicted_charges"], json!(35500.0));
}

#[tokio::test]
async fn test_key_order_does_not_matter() {
    let reordered =
        r#"{"region":"southeast","smoker":"no","children":0,"bmi":28.5,"sex":"male","age":25}"#;
    let (status, body) = post_predict(reordered.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["predicted_charges"], json!(2286.67));
}

#[tokio::test]
async fn test_invalid_sex_lists_allowed_values() {
    let mut body = example();
    body["sex"] = json!("other");
    let (status, body) = post_predict(body.to_string()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("sex"));
    assert!(detail.contains("'female', 'male'"));
}

#[tokio::test]
async fn test_negative_age_rejected() {
    let mut body = example();
    body["age"] = json!(-5);
    let (status, body) = post_predict(body.to_string()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().starts_with("age:"));
}

#[tokio::test]
async fn test_missing_bmi_named() {
    let mut body = example();
    body.as_object_mut().unwrap().remove("bmi");
    let (status, body) = post_predict(body.to_string()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"], json!("bmi: field required"));
}

#[tokio::test]
async fn test_multiple_violations_reported_together() {
    let body = json!({
        "age": 0, "sex": "Male", "bmi": 20.0,
        "children": -1, "smoker": "no", "region": "east"
    });
    let (status, body) = post_predict(body.to_string()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let detail = body["detail"].as_str().unwrap();
    for field in ["age:", "sex:", "children:", "region:"] {
        assert!(detail.contains(field), "missing {} in {}", field, detail);
    }
}

#[tokio::test]
async fn test_inference_failure_detail_is_opaque() {
    let (status, body) = post_predict_to(broken_app(), example().to_string()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "detail": "Prediction failed" }));
    assert!(!body.to_string().contains("0xdeadbeef"));
}

#[tokio::test]
async fn test_malformed_json() {
    let (status, body) = post_predict("{\"age\": 25,".to_string()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_missing_content_type() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/predict")
                .body(Body::from(example().to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = test_app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model"], "random_forest");
    assert_eq!(body["n_features"], 6);
}

#[tokio::test]
async fn test_service_info() {
    let response = test_app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["title"], "Insurance Charges Prediction API");
}

#[tokio::test]
async fn test_unknown_route() {
    let response = test_app()
        .oneshot(Request::builder().uri("/train").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_predict_not_allowed() {
    let response = test_app()
        .oneshot(Request::builder().uri("/predict").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
