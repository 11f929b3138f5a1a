//! Integration test: classifier HTTP API

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::*;
use veritas_model::Pipeline;

#[tokio::test]
async fn test_root_reports_running() {
    let response = send(
        test_app(),
        Request::builder().uri("/").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, serde_json::json!({"message": "API running"}));
}

#[tokio::test]
async fn test_empty_text_is_unknown() {
    let response = send(test_app(), post_predict(r#"{"text": ""}"#)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        serde_json::json!({"label": "Unknown", "confidence": 0.0})
    );
}

#[tokio::test]
async fn test_whitespace_text_is_unknown() {
    let response = send(test_app(), post_predict(r#"{"text": "  \n\t "}"#)).await;

    assert_eq!(
        json_body(response).await,
        serde_json::json!({"label": "Unknown", "confidence": 0.0})
    );
}

#[tokio::test]
async fn test_out_of_vocabulary_has_note() {
    let response = send(test_app(), post_predict(r#"{"text": "xyzzyqqqqzzzzznonsense1234"}"#)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        serde_json::json!({
            "label": "Unknown",
            "confidence": 0.0,
            "note": "No known vocabulary words"
        })
    );
}

#[tokio::test]
async fn test_real_sample() {
    let body = serde_json::json!({ "text": REAL_SAMPLE }).to_string();
    let response = send(test_app(), post_predict(&body)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["label"], "Real");
    let confidence = json["confidence"].as_f64().unwrap();
    assert!(confidence > 0.5 && confidence <= 1.0, "confidence {}", confidence);
    assert!(json.get("note").is_none());
}

#[tokio::test]
async fn test_fake_sample() {
    let response = send(test_app(), post_predict(r#"{"text": "Shocking secret about aliens"}"#)).await;

    let json = json_body(response).await;
    assert_eq!(json["label"], "Fake");
    let confidence = json["confidence"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&confidence));
}

#[tokio::test]
async fn test_missing_text_is_rejected() {
    let response = send(test_app(), post_predict(r#"{"body": "hello"}"#)).await;
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let response = send(test_app(), post_predict("{not json")).await;
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_inference_failure_is_server_error() {
    let app = app_with(Pipeline::new(Box::new(Keyword), Box::new(Wide)));
    let response = send(app, post_predict(r#"{"text": "breaking news"}"#)).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = json_body(response).await;
    assert!(json["error"].as_str().unwrap().contains("Shape mismatch"));
}

#[tokio::test]
async fn test_cors_preflight_from_allowed_origin() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/predict")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let response = send(test_app(), request).await;

    assert!(response.status().is_success());
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "http://localhost:5173");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "content-type");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}

#[tokio::test]
async fn test_cors_rejects_unlisted_origin() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/predict")
        .header(header::ORIGIN, "http://evil.example:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = send(test_app(), request).await;

    assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn test_cors_on_simple_request() {
    let request = Request::builder()
        .uri("/")
        .header(header::ORIGIN, "http://127.0.0.1:3000")
        .body(Body::empty())
        .unwrap();
    let response = send(test_app(), request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://127.0.0.1:3000"
    );
}
