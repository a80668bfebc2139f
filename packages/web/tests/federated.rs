mod common;

use std::collections::HashMap;

use api::AccountStore;
use axum::http::StatusCode;
use common::{body_text, location, session_cookie, spawn_mock_provider, TestApp, MOCK_SUBJECT};

/// Run step 1 and return (provider URL query params, session cookie).
async fn start(app: &TestApp, base: &str) -> (HashMap<String, String>, String) {
    let response = app.get("/auth/external", None).await;
    let target = location(&response).to_string();
    assert!(target.starts_with(&format!("{base}/authorize?")), "{target}");

    let cookie = session_cookie(&response).expect("handshake cookie");
    let params = reqwest::Url::parse(&target)
        .unwrap()
        .query_pairs()
        .into_owned()
        .collect();
    (params, cookie)
}

async fn federated_login(app: &TestApp, base: &str) -> String {
    let (params, cookie) = start(app, base).await;
    let callback = format!("/auth/external/callback?code=good-code&state={}", params["state"]);

    let response = app.get(&callback, Some(&cookie)).await;
    assert_eq!(location(&response), "/documentation");
    session_cookie(&response).expect("session cookie after federated login")
}

#[tokio::test]
async fn test_redirect_to_provider() {
    let base = spawn_mock_provider().await;
    let app = TestApp::with_provider(&base, "/token", "/userinfo");

    let (params, _) = start(&app, &base).await;
    assert_eq!(params["client_id"], "docs-client");
    assert_eq!(params["scope"], "profile");
    assert_eq!(params["redirect_uri"], "http://localhost:3000/auth/external/callback");
    assert_eq!(params["code_challenge_method"], "S256");
}

#[tokio::test]
async fn test_full_round_trip() {
    let base = spawn_mock_provider().await;
    let app = TestApp::with_provider(&base, "/token", "/userinfo");

    let cookie = federated_login(&app, &base).await;

    let response = app.get("/documentation", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Signed in as Ada Lovelace."));

    let account = app
        .accounts
        .find_by_federated_subject(MOCK_SUBJECT)
        .await
        .unwrap()
        .expect("federated account");
    assert!(account.username.is_none());
    assert!(account.password_hash.is_none());
    assert_eq!(account.federated_profile.unwrap()["picture"], "https://example.com/ada.png");
}

#[tokio::test]
async fn test_repeat_login_reuses_account() {
    let base = spawn_mock_provider().await;
    let app = TestApp::with_provider(&base, "/token", "/userinfo");

    federated_login(&app, &base).await;
    let first = app.accounts.find_by_federated_subject(MOCK_SUBJECT).await.unwrap().unwrap();

    federated_login(&app, &base).await;
    let second = app.accounts.find_by_federated_subject(MOCK_SUBJECT).await.unwrap().unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(app.accounts.len().await, 1);
}

#[tokio::test]
async fn test_provider_error_redirects_to_login() {
    let base = spawn_mock_provider().await;
    let app = TestApp::with_provider(&base, "/token", "/userinfo");

    let (params, cookie) = start(&app, &base).await;
    let callback = format!(
        "/auth/external/callback?error=access_denied&state={}",
        params["state"]
    );
    let response = app.get(&callback, Some(&cookie)).await;

    assert_eq!(location(&response), "/login?error=oauth_error");
    assert!(app.accounts.is_empty().await);
    assert_eq!(location(&app.get("/documentation", Some(&cookie)).await), "/login");
}

#[tokio::test]
async fn test_state_mismatch_is_rejected() {
    let base = spawn_mock_provider().await;
    let app = TestApp::with_provider(&base, "/token", "/userinfo");

    let (_, cookie) = start(&app, &base).await;
    let response = app
        .get("/auth/external/callback?code=good-code&state=forged", Some(&cookie))
        .await;

    assert_eq!(location(&response), "/login?error=state_mismatch");
    assert!(app.accounts.is_empty().await);
}

#[tokio::test]
async fn test_callback_without_handshake_is_rejected() {
    let base = spawn_mock_provider().await;
    let app = TestApp::with_provider(&base, "/token", "/userinfo");

    let response = app
        .get("/auth/external/callback?code=good-code&state=anything", None)
        .await;
    assert_eq!(location(&response), "/login?error=state_mismatch");
}

#[tokio::test]
async fn test_handshake_is_single_use() {
    let base = spawn_mock_provider().await;
    let app = TestApp::with_provider(&base, "/token", "/userinfo");

    let (params, cookie) = start(&app, &base).await;
    let callback = format!("/auth/external/callback?code=good-code&state={}", params["state"]);

    let forged = app
        .get("/auth/external/callback?code=good-code&state=forged", Some(&cookie))
        .await;
    assert_eq!(location(&forged), "/login?error=state_mismatch");

    // The genuine state was consumed by the failed attempt
    let replay = app.get(&callback, Some(&cookie)).await;
    assert_eq!(location(&replay), "/login?error=state_mismatch");
    assert!(app.accounts.is_empty().await);
}

#[tokio::test]
async fn test_rejected_code_redirects_to_login() {
    let base = spawn_mock_provider().await;
    let app = TestApp::with_provider(&base, "/rejecting-token", "/userinfo");

    let (params, cookie) = start(&app, &base).await;
    let callback = format!("/auth/external/callback?code=bad-code&state={}", params["state"]);
    let response = app.get(&callback, Some(&cookie)).await;

    assert_eq!(location(&response), "/login?error=oauth_error");
    assert!(app.accounts.is_empty().await);
}

#[tokio::test]
async fn test_profile_without_subject_is_rejected() {
    let base = spawn_mock_provider().await;
    let app = TestApp::with_provider(&base, "/token", "/userinfo-without-subject");

    let (params, cookie) = start(&app, &base).await;
    let callback = format!("/auth/external/callback?code=good-code&state={}", params["state"]);
    let response = app.get(&callback, Some(&cookie)).await;

    assert_eq!(location(&response), "/login?error=oauth_profile");
    assert!(app.accounts.is_empty().await);
}

#[tokio::test]
async fn test_stalled_provider_times_out() {
    let base = spawn_mock_provider().await;
    let app = TestApp::with_provider(&base, "/slow-token", "/userinfo");

    let (params, cookie) = start(&app, &base).await;
    let callback = format!("/auth/external/callback?code=good-code&state={}", params["state"]);

    let started = std::time::Instant::now();
    let response = app.get(&callback, Some(&cookie)).await;

    assert_eq!(location(&response), "/login?error=oauth_error");
    assert!(started.elapsed() < std::time::Duration::from_secs(4));
    assert!(app.accounts.is_empty().await);
}
