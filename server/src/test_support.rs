//! In-process harness for handler tests: the full router over memory backends.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use image::{ImageFormat, Rgb, RgbImage};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::api;
use crate::auth::TokenService;
use crate::repo::MemoryRepository;
use crate::state::AppState;
use crate::storage::MemoryObjectStore;

pub const BUCKET: &str = "test-images";
pub const IMAGE_BASE_URL: &str = "http://images.test";
const BOUNDARY: &str = "xprecipes-test-boundary";

pub struct TestApp {
    router: Router,
    pub repo: Arc<MemoryRepository>,
    pub storage: Arc<MemoryObjectStore>,
    pub tokens: Arc<TokenService>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_storage(MemoryObjectStore::new(IMAGE_BASE_URL))
    }

    pub fn with_storage(storage: MemoryObjectStore) -> Self {
        let repo = Arc::new(MemoryRepository::new());
        let storage = Arc::new(storage);
        let tokens = Arc::new(TokenService::new(
            b"handler-test-secret",
            Duration::from_secs(900),
            Duration::from_secs(3600),
        ));

        let state = AppState {
            users: repo.clone(),
            recipes: repo.clone(),
            storage: storage.clone(),
            tokens: tokens.clone(),
            image_bucket: Arc::from(BUCKET),
        };

        Self {
            router: api::router(state),
            repo,
            storage,
            tokens,
        }
    }

    /// Send a request; the body comes back as JSON, or as a JSON string when it is not JSON.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, body)
    }

    pub async fn register(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.send(json_request(
            Method::POST,
            "/register",
            None,
            json!({"username": username, "password": password}),
        ))
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.send(json_request(
            Method::POST,
            "/login",
            None,
            json!({"username": username, "password": password}),
        ))
        .await
    }

    /// Register `username` and return a fresh access token for it.
    pub async fn access_token(&self, username: &str) -> String {
        let (status, _) = self.register(username, "hunter22").await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, body) = self.login(username, "hunter22").await;
        assert_eq!(status, StatusCode::OK);
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Create the soup recipe for `token` and return its JSON.
    pub async fn create_soup(&self, token: &str) -> Value {
        let (status, body) = self
            .send(json_request(Method::POST, "/recipes", Some(token), soup()))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }
}

pub fn soup() -> Value {
    json!({
        "title": "Soup",
        "ingredients": "salt",
        "ingredient_quantity": 1.5,
        "unit": "tsp",
        "calories": 50,
        "cooktime": 10
    })
}

/// Soup as multipart text parts.
pub fn soup_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("title", "Soup"),
        ("ingredients", "salt"),
        ("ingredient_quantity", "1.5"),
        ("unit", "tsp"),
        ("calories", "50"),
        ("cooktime", "10"),
    ]
}

fn authorized(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {}", token)),
        None => builder,
    }
}

pub fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    authorized(method, uri, token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    authorized(method, uri, token).body(Body::empty()).unwrap()
}

pub fn multipart_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    fields: &[(&str, &str)],
    image: Option<(&str, &[u8])>,
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, data)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    authorized(method, uri, token)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn png_bytes() -> Vec<u8> {
    let img = RgbImage::from_pixel(8, 8, Rgb([120, 200, 40]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}
