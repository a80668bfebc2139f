//! HTTP routes.
//!
//! Every handler ends in a page or a redirect. Failures are logged and turned into a
//! redirect back to a safe page carrying a short `error` code; nothing here returns
//! an error body.

use api::auth::CallbackParams;
use api::{AuthError, AuthState, SessionIdentity};
use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::extract::{FromRequestParts, Query, State};
use axum::http::request::Parts;
use axum::response::{Html, Redirect};
use axum::routing::get;
use axum::{Form, Router};
use serde::Deserialize;
use tower_sessions::Session;

use crate::pages::{self, Page};
use crate::AppState;

pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const PROTECTED_PATH: &str = "/documentation";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route(LOGIN_PATH, get(login_page).post(login))
        .route(REGISTER_PATH, get(register_page).post(register))
        .route("/logout", get(logout))
        .route("/auth/external", get(external_login))
        .route("/auth/external/callback", get(external_callback))
        .route(PROTECTED_PATH, get(documentation))
}

/// Login/registration form body.
#[derive(Deserialize)]
pub struct Credentials {
    username: String,
    password: String,
}

/// Extractor for protected routes: the current identity, or a redirect to the login page.
pub struct RequireAuth(pub SessionIdentity);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::error!("session unavailable: {:?}", rejection);
                Redirect::to(LOGIN_PATH)
            })?;

        match state.auth.current(&session).await {
            Ok(AuthState::Authenticated(identity)) => Ok(Self(identity)),
            Ok(_) => Err(Redirect::to(LOGIN_PATH)),
            Err(e) => {
                tracing::warn!("could not read session: {}", e);
                Err(Redirect::to(LOGIN_PATH))
            }
        }
    }
}

fn fail(page: &str, err: &AuthError) -> Redirect {
    Redirect::to(&format!("{}?error={}", page, err.code()))
}

async fn home() -> Html<&'static str> {
    pages::render(Page::Home)
}

async fn login_page() -> Html<&'static str> {
    pages::render(Page::Login)
}

async fn register_page() -> Html<&'static str> {
    pages::render(Page::Register)
}

async fn login(
    State(state): State<AppState>,
    session: Session,
    form: Result<Form<Credentials>, FormRejection>,
) -> Redirect {
    let Ok(Form(form)) = form else {
        return fail(LOGIN_PATH, &AuthError::InvalidInput("login form".to_string()));
    };

    match state.auth.login_local(&session, &form.username, &form.password).await {
        Ok(_) => Redirect::to(PROTECTED_PATH),
        Err(e) => {
            tracing::warn!("local login failed: {}", e);
            fail(LOGIN_PATH, &e)
        }
    }
}

async fn register(
    State(state): State<AppState>,
    session: Session,
    form: Result<Form<Credentials>, FormRejection>,
) -> Redirect {
    let Ok(Form(form)) = form else {
        return fail(REGISTER_PATH, &AuthError::InvalidInput("registration form".to_string()));
    };

    match state.auth.register(&session, &form.username, &form.password).await {
        Ok(_) => Redirect::to(PROTECTED_PATH),
        Err(e) => {
            tracing::warn!("registration failed: {}", e);
            fail(REGISTER_PATH, &e)
        }
    }
}

async fn logout(State(state): State<AppState>, session: Session) -> Redirect {
    if let Err(e) = state.auth.logout(&session).await {
        tracing::error!("failed to destroy session: {}", e);
    }
    Redirect::to("/")
}

async fn external_login(State(state): State<AppState>, session: Session) -> Redirect {
    match state.auth.begin_federated(&session).await {
        Ok(url) => Redirect::to(&url),
        Err(e) => {
            tracing::error!("cannot start external login: {}", e);
            fail(LOGIN_PATH, &e)
        }
    }
}

async fn external_callback(
    State(state): State<AppState>,
    session: Session,
    params: Result<Query<CallbackParams>, QueryRejection>,
) -> Redirect {
    let params = params.map(|Query(p)| p).unwrap_or_default();

    match state.auth.complete_federated(&session, params).await {
        Ok(_) => Redirect::to(PROTECTED_PATH),
        Err(e) => {
            tracing::error!("external login failed: {}", e);
            fail(LOGIN_PATH, &e)
        }
    }
}

async fn documentation(RequireAuth(identity): RequireAuth) -> Html<String> {
    pages::render_documentation(&identity)
}
