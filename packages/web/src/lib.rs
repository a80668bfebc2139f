//! # Web crate: HTTP surface of the documentation site
//!
//! Wires [`api::Authenticator`] to axum routes behind a tower-sessions layer.
//!
//! | Method | Path | Effect |
//! |--------|------|--------|
//! | GET | `/` | landing page |
//! | GET/POST | `/login` | login form / local login |
//! | GET/POST | `/register` | registration form / create local account |
//! | GET | `/logout` | destroy the session |
//! | GET | `/auth/external` | start the federated flow |
//! | GET | `/auth/external/callback` | finish the federated flow |
//! | GET | `/documentation` | protected page, redirects to `/login` without a session |

use anyhow::anyhow;
use api::{Authenticator, Settings};
use axum::Router;
use tower_sessions::cookie::time::Duration;
use tower_sessions::cookie::{Key, SameSite};
use tokio::task::JoinHandle;
use tower_sessions::{ExpiredDeletion, Expiry, SessionManagerLayer, SessionStore};

pub mod pages;
pub mod routes;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub auth: Authenticator,
}

impl AppState {
    pub fn new(auth: Authenticator) -> Self {
        Self { auth }
    }
}

/// Build the application router on top of the given session store.
///
/// Session cookies are signed with a key taken from `settings.secret` and expire
/// after seven days of inactivity.
pub fn app<S>(state: AppState, session_store: S, settings: &Settings) -> anyhow::Result<Router>
where
    S: SessionStore + Clone,
{
    let key = Key::try_from(settings.secret.as_bytes())
        .map_err(|e| anyhow!("unusable session secret: {:?}", e))?;

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(settings.secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::days(7)))
        .with_signed(key);

    Ok(routes::router().layer(session_layer).with_state(state))
}

/// Sweep expired session records out of `store` every `period`.
///
/// The task ends only if a sweep fails; the error is logged.
pub fn spawn_expired_session_cleanup<S>(store: S, period: tokio::time::Duration) -> JoinHandle<()>
where
    S: ExpiredDeletion + Clone,
{
    tokio::spawn(async move {
        if let Err(e) = store.continuously_delete_expired(period).await {
            tracing::error!("expired session cleanup stopped: {}", e);
        }
    })
}
