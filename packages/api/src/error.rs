//! Error taxonomy for the authentication core.

use thiserror::Error;

/// Everything that can go wrong while establishing or checking an identity.
///
/// None of these are meant to reach the user verbatim: the web layer turns every
/// variant into a redirect to a safe page and uses [`AuthError::code`] as the
/// only detail it exposes.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no account with that username")]
    NoSuchAccount,

    #[error("credential did not match")]
    BadCredential,

    #[error("username {0:?} is already registered")]
    DuplicateUsername(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("account store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("session store error: {0}")]
    SessionStore(String),

    #[error("corrupt session payload: {0}")]
    CorruptSession(String),

    #[error("external provider is not configured")]
    ProviderUnavailable,

    #[error("oauth state missing or mismatched")]
    StateMismatch,

    #[error("provider exchange failed: {0}")]
    ProviderExchangeFailed(String),

    #[error("malformed provider profile: {0}")]
    MalformedProfile(String),

    #[error("password hashing error: {0}")]
    PasswordHash(String),
}

impl AuthError {
    /// Short machine-readable code, safe to put in a redirect query string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoSuchAccount | Self::BadCredential => "invalid_credentials",
            Self::DuplicateUsername(_) => "username_taken",
            Self::InvalidInput(_) => "invalid_input",
            Self::StoreUnavailable(_) => "store_unavailable",
            Self::SessionStore(_) => "session_error",
            Self::CorruptSession(_) => "session_error",
            Self::ProviderUnavailable => "provider_unavailable",
            Self::StateMismatch => "state_mismatch",
            Self::ProviderExchangeFailed(_) => "oauth_error",
            Self::MalformedProfile(_) => "oauth_profile",
            Self::PasswordHash(_) => "internal_error",
        }
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}

impl From<tower_sessions::session::Error> for AuthError {
    fn from(err: tower_sessions::session::Error) -> Self {
        Self::SessionStore(err.to_string())
    }
}
