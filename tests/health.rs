mod common;

use axum::{body::Body, http::Request};

#[tokio::test]
async fn health_reports_database() {
    let app = common::app().await;
    let (status, body) = common::send(
        &app,
        Request::builder()
            .uri("/health")
            .method("GET")
            .body(Body::empty())
            .expect("request"),
    )
    .await;

    assert_eq!(status, axum::http::StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
}
