use axum::{
    body::{to_bytes, Body, Bytes},
    http::{header, Request, Response},
    Router,
};
use chrono_tz::Tz;
use sqlx::SqlitePool;
use tower::ServiceExt;

use super::{app, cookies::CookieKey};
use crate::{auth::AdminCredentials, AppConfig, AppState};

pub const TEST_USERNAME: &str = "chef";
pub const TEST_PASSWORD: &str = "mise-en-place";

const MULTIPART_BOUNDARY: &str = "margin-test-boundary";

pub fn test_state(pool: SqlitePool) -> AppState {
    let password_hash = AdminCredentials::hash_password(TEST_USERNAME, TEST_PASSWORD).unwrap();

    AppState {
        app: AppConfig {
            database_url: "sqlite::memory:".to_string(),
            port: 0,
            display_timezone: Tz::UTC,
        },
        admin: AdminCredentials::new(TEST_USERNAME, &password_hash).unwrap(),
        db: pool,
        cookie_key: CookieKey(tower_cookies::Key::generate()),
    }
}

pub fn create_test_app(pool: SqlitePool) -> Router {
    app(test_state(pool))
}

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
    let mut request = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }

    send(app, request.body(Body::empty()).unwrap()).await
}

pub async fn post_form(
    app: &Router,
    uri: &str,
    cookie: Option<&str>,
    fields: &[(&str, &str)],
) -> Response<Body> {
    let body = serde_urlencoded::to_string(fields).unwrap();

    let mut request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }

    send(app, request.body(Body::from(body)).unwrap()).await
}

/// Uploads `contents` as a file in a single-field multipart form.
pub async fn multipart_upload(
    app: &Router,
    uri: &str,
    cookie: Option<&str>,
    field: &str,
    contents: &[u8],
) -> Response<Body> {
    let mut body = format!(
        "--{MULTIPART_BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"recipes.json\"\r\n\
         Content-Type: application/json\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

    let mut request = Request::builder().method("POST").uri(uri).header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
    );
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }

    send(app, request.body(Body::from(body)).unwrap()).await
}

/// Logs in as the test admin and returns a `Cookie` header value carrying the
/// session.
pub async fn login(app: &Router) -> String {
    let response = post_form(
        app,
        "/login",
        None,
        &[("username", TEST_USERNAME), ("password", TEST_PASSWORD)],
    )
    .await;
    assert_eq!(location(&response), "/");

    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|c| c.to_str().unwrap().split(';').next())
        .map(str::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .map(|l| l.to_str().unwrap())
        .unwrap_or_default()
}

pub async fn response_body_bytes(response: Response<Body>) -> Bytes {
    to_bytes(response.into_body(), usize::MAX).await.unwrap()
}

pub async fn response_body_string(response: Response<Body>) -> String {
    String::from_utf8(response_body_bytes(response).await.to_vec()).unwrap()
}
