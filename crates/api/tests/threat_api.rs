//! `/threat` endpoints. Stateless, so no database is needed.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, build_test_app, get, lazy_pool, post_json, send};
use serde_json::json;

#[tokio::test]
async fn evaluate_scores_and_classifies() {
    let app = build_test_app(lazy_pool());
    let response = post_json(
        app.router,
        "/api/v1/threat/evaluate",
        json!({"temperature": 20.0, "soundLevel": 111.0, "aqi": 0.0}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["score"], 38);
    assert_eq!(json["breakdown"]["sound"], 33);
    assert_eq!(json["tier"], "moderate");
    assert_eq!(json["level"], "critical");
    assert_eq!(json["presentation"]["level"]["label"], "CRITICAL");
    assert_eq!(json["presentation"]["level"]["pulse"], true);
    assert_eq!(json["channels"][1]["status"], "critical");
}

#[tokio::test]
async fn evaluate_quiet_room_is_safe() {
    let app = build_test_app(lazy_pool());
    let response = post_json(
        app.router,
        "/api/v1/threat/evaluate",
        json!({"temperature": 15.0, "soundLevel": 0.0, "aqi": 0.0}),
    )
    .await;

    let json = body_json(response).await;
    assert_eq!(json["score"], 5);
    assert_eq!(json["tier"], "minimal");
    assert_eq!(json["level"], "safe");
    assert_eq!(json["presentation"]["level"]["message"], "No threats detected. Area is secure.");
}

#[tokio::test]
async fn evaluate_rejects_out_of_range_number() {
    // 1e999 does not fit an f64; it must not reach the scorer.
    let app = build_test_app(lazy_pool());
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/threat/evaluate")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"temperature": 1e999, "soundLevel": 0, "aqi": 0}"#))
        .unwrap();
    let response = send(app.router, request).await;

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn evaluate_requires_every_channel() {
    let app = build_test_app(lazy_pool());
    let response = post_json(
        app.router,
        "/api/v1/threat/evaluate",
        json!({"temperature": 20.0}),
    )
    .await;

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn presentation_table_lists_every_tier() {
    let app = build_test_app(lazy_pool());
    let response = get(app.router, "/api/v1/threat/presentation").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let levels: Vec<_> = json["levels"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["level"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(levels, ["safe", "warning", "danger", "critical"]);
    assert_eq!(json["tiers"].as_array().unwrap().len(), 4);
    assert_eq!(json["levels"][3]["color"], "red");
}
