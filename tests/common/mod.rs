use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use ridelog_rs::{config::Config, routes, state::AppState, store};
use serde_json::Value;
use tower::ServiceExt;

/// The worked two-point ride: 54.0/18.0 at 10:00 to 54.1/18.1 at 10:30.
#[allow(dead_code)]
pub const TWO_POINT_GPX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <trk><name>Morning Ride</name><desc>not a number</desc><trkseg>
    <trkpt lat="54.0" lon="18.0"><ele>100</ele><time>2023-01-01T10:00:00Z</time><desc>120</desc></trkpt>
    <trkpt lat="54.1" lon="18.1"><ele>150</ele><time>2023-01-01T10:30:00Z</time><desc>140</desc></trkpt>
  </trkseg></trk>
</gpx>"#;

#[allow(dead_code)]
pub async fn app() -> Router {
    let pool = store::init_memory_pool().await.expect("memory pool");
    let state = AppState::new(Config::from_env(), pool);
    Router::new()
        .merge(routes::health::router())
        .merge(routes::users::router())
        .merge(routes::sessions::router())
        .merge(routes::tracks::router())
        .with_state(state)
}

#[allow(dead_code)]
pub fn multipart_body(file_name: &str, file_body: &str, boundary: &str) -> String {
    format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n{file_body}\r\n--{boundary}--\r\n"
    )
}

#[allow(dead_code)]
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("json body")
    };
    (status, json)
}

#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(method)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[allow(dead_code)]
pub fn authed(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(method)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request")
}

#[allow(dead_code)]
pub fn upload_request(token: &str, file_name: &str, file_body: &str) -> Request<Body> {
    let boundary = "X-BOUNDARY-TEST";
    Request::builder()
        .uri("/api/tracks")
        .method("POST")
        .header("authorization", format!("Bearer {token}"))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(multipart_body(file_name, file_body, boundary)))
        .expect("request")
}

/// Registers `name` and returns a fresh session token.
#[allow(dead_code)]
pub async fn login(app: &Router, name: &str) -> String {
    let (status, _) = send(
        app,
        json_request(
            "POST",
            "/api/users",
            serde_json::json!({
                "name": name,
                "password": "hunter2",
                "password_confirmation": "hunter2"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/sessions",
            serde_json::json!({ "name": name, "password": "hunter2" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body.get("token")
        .and_then(Value::as_str)
        .expect("token")
        .to_string()
}
