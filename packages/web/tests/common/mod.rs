//! Shared helpers for router tests: an in-memory app and a mock OAuth provider.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use api::auth::{OAuthConfig, OAuthProvider};
use api::store::MemoryAccountStore;
use api::{Authenticator, Settings};
use axum::body::Body;
use axum::http::{header, HeaderMap, Request, Response, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower::ServiceExt;
use tower_sessions::MemoryStore;
use web::AppState;

pub const MOCK_ACCESS_TOKEN: &str = "mock-access-token";
pub const MOCK_SUBJECT: &str = "mock-subject-1";

pub struct TestApp {
    pub router: Router,
    pub accounts: MemoryAccountStore,
}

impl TestApp {
    /// App without an external provider.
    pub fn new() -> Self {
        Self::with_vars(Vec::new())
    }

    pub fn with_vars(extra: Vec<(&'static str, String)>) -> Self {
        let mut vars = vec![("SECRET", "t".repeat(64))];
        vars.extend(extra);
        let settings = Settings::from_vars(vars).expect("test settings");

        let provider = OAuthConfig::from_settings(&settings)
            .expect("provider config")
            .map(|config| OAuthProvider::new(config).expect("provider"));

        let accounts = MemoryAccountStore::new();
        let auth = Authenticator::new(Arc::new(accounts.clone()), provider);
        let router = web::app(AppState::new(auth), MemoryStore::default(), &settings)
            .expect("router");

        Self { router, accounts }
    }

    /// App whose provider endpoints point at a mock server.
    pub fn with_provider(base: &str, token_path: &str, userinfo_path: &str) -> Self {
        Self::with_vars(vec![
            ("CLIENT_ID", "docs-client".to_string()),
            ("CLIENT_SECRET", "docs-secret".to_string()),
            ("AUTH_URL", format!("{base}/authorize")),
            ("TOKEN_URL", format!("{base}{token_path}")),
            ("USERINFO_URL", format!("{base}{userinfo_path}")),
            ("PROVIDER_TIMEOUT_SECS", "1".to_string()),
        ])
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut request = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.send(request.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response<Body> {
        let mut request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.send(request.body(Body::from(body.to_string())).unwrap())
            .await
    }

    async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Register and return the resulting session cookie.
    pub async fn register(&self, username: &str, password: &str) -> String {
        let response = self
            .post_form("/register", &format!("username={username}&password={password}"), None)
            .await;
        assert_eq!(location(&response), "/documentation");
        session_cookie(&response).expect("session cookie after registration")
    }
}

/// Target of a redirect response.
pub fn location(response: &Response<Body>) -> &str {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    response
        .headers()
        .get(header::LOCATION)
        .expect("location header")
        .to_str()
        .unwrap()
}

/// `name=value` part of the session Set-Cookie header, if one was sent.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .find(|pair| pair.starts_with("id=") && pair.len() > "id=".len())
        .map(str::to_string)
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn token() -> Json<serde_json::Value> {
    Json(json!({
        "access_token": MOCK_ACCESS_TOKEN,
        "token_type": "bearer",
        "expires_in": 3600,
    }))
}

async fn slow_token() -> Json<serde_json::Value> {
    tokio::time::sleep(Duration::from_secs(5)).await;
    token().await
}

async fn rejecting_token() -> impl IntoResponse {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": "invalid_grant"})),
    )
}

async fn userinfo(headers: HeaderMap) -> impl IntoResponse {
    let expected = format!("Bearer {MOCK_ACCESS_TOKEN}");
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected);

    if !authorized {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({
        "sub": MOCK_SUBJECT,
        "name": "Ada Lovelace",
        "picture": "https://example.com/ada.png",
    }))
    .into_response()
}

async fn userinfo_without_subject() -> Json<serde_json::Value> {
    Json(json!({"name": "Nobody In Particular"}))
}

/// Serve a fake OAuth provider on an ephemeral port and return its base URL.
pub async fn spawn_mock_provider() -> String {
    let app = Router::new()
        .route("/token", post(token))
        .route("/slow-token", post(slow_token))
        .route("/rejecting-token", post(rejecting_token))
        .route("/userinfo", get(userinfo))
        .route("/userinfo-without-subject", get(userinfo_without_subject));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}
