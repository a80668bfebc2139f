//! # Authentication orchestrator
//!
//! [`Authenticator`] composes the credential verifier, the federated resolver, the
//! provider client and the session codec into the three supported flows:
//!
//! | Flow | Entry points |
//! |------|--------------|
//! | Local | [`register`](Authenticator::register), [`login_local`](Authenticator::login_local) |
//! | Federated | [`begin_federated`](Authenticator::begin_federated), [`complete_federated`](Authenticator::complete_federated) |
//! | Logout | [`logout`](Authenticator::logout) |
//!
//! [`current`](Authenticator::current) answers "who is this request?" from the
//! session alone. Every successful flow ends in `establish`, which cycles the session
//! id before writing the serialized identity.

use std::sync::Arc;

use tower_sessions::Session;

use super::credentials::CredentialVerifier;
use super::federated::FederatedResolver;
use super::provider::{CallbackParams, OAuthProvider, PendingAuthorization};
use super::session::{self as codec, SessionPayload, SESSION_IDENTITY_KEY, SESSION_PENDING_OAUTH_KEY};
use crate::models::{Account, SessionIdentity};
use crate::store::AccountStore;
use crate::AuthError;

/// Per-request authentication state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    /// A federated handshake was started in this session and has not completed.
    Authenticating,
    Authenticated(SessionIdentity),
}

impl AuthState {
    pub fn identity(&self) -> Option<&SessionIdentity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity().is_some()
    }
}

#[derive(Clone)]
pub struct Authenticator {
    store: Arc<dyn AccountStore>,
    credentials: CredentialVerifier,
    resolver: FederatedResolver,
    provider: Option<Arc<OAuthProvider>>,
}

impl Authenticator {
    pub fn new(store: Arc<dyn AccountStore>, provider: Option<OAuthProvider>) -> Self {
        Self {
            credentials: CredentialVerifier::new(store.clone()),
            resolver: FederatedResolver::new(store.clone()),
            provider: provider.map(Arc::new),
            store,
        }
    }

    /// The account store, for callers that need fresh account state.
    pub fn store(&self) -> &Arc<dyn AccountStore> {
        &self.store
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Resolve the current state from the session without touching the account store.
    ///
    /// A corrupt identity payload is dropped from the session and the request is
    /// treated as unauthenticated.
    pub async fn current(&self, session: &Session) -> Result<AuthState, AuthError> {
        if let Some(payload) = session.get::<SessionPayload>(SESSION_IDENTITY_KEY).await? {
            match codec::deserialize(&payload) {
                Ok(identity) => return Ok(AuthState::Authenticated(identity)),
                Err(e) => {
                    tracing::warn!("discarding session payload: {}", e);
                    session.remove_value(SESSION_IDENTITY_KEY).await?;
                }
            }
        }

        if session.get_value(SESSION_PENDING_OAUTH_KEY).await?.is_some() {
            return Ok(AuthState::Authenticating);
        }
        Ok(AuthState::Unauthenticated)
    }

    /// Verify a username/password pair and log the session in.
    pub async fn login_local(
        &self,
        session: &Session,
        username: &str,
        password: &str,
    ) -> Result<SessionIdentity, AuthError> {
        let account = self.credentials.verify(username, password).await?;
        tracing::info!(account_id = %account.id, "local login");
        self.establish(session, &account).await
    }

    /// Create a local account and log the session in as it.
    pub async fn register(
        &self,
        session: &Session,
        username: &str,
        password: &str,
    ) -> Result<SessionIdentity, AuthError> {
        let account = self.credentials.register(username, password).await?;
        tracing::info!(account_id = %account.id, "registered local account");
        self.establish(session, &account).await
    }

    /// Step 1 of the federated flow: remember the handshake and return the URL to
    /// send the user agent to.
    pub async fn begin_federated(&self, session: &Session) -> Result<String, AuthError> {
        let provider = self.provider()?;
        let (url, pending) = provider.authorize_url();
        session.insert(SESSION_PENDING_OAUTH_KEY, &pending).await?;
        Ok(url)
    }

    /// Step 2 of the federated flow, driven by the provider's callback.
    pub async fn complete_federated(
        &self,
        session: &Session,
        params: CallbackParams,
    ) -> Result<SessionIdentity, AuthError> {
        // The handshake is single use whatever the outcome
        let pending = session.remove_value(SESSION_PENDING_OAUTH_KEY).await?;

        if let Some(error) = params.error {
            return Err(AuthError::ProviderExchangeFailed(format!(
                "provider returned {error}"
            )));
        }

        let provider = self.provider()?;

        let pending: PendingAuthorization = pending
            .and_then(|value| serde_json::from_value(value).ok())
            .ok_or(AuthError::StateMismatch)?;

        let (Some(code), Some(state)) = (params.code, params.state) else {
            return Err(AuthError::ProviderExchangeFailed(
                "callback without code or state".to_string(),
            ));
        };
        if state != pending.csrf_state {
            return Err(AuthError::StateMismatch);
        }

        let profile = provider.fetch_profile(&code, pending).await?;
        let account = self.resolver.resolve_or_create(&profile).await?;
        tracing::info!(account_id = %account.id, "federated login");
        self.establish(session, &account).await
    }

    /// Destroy the session. A no-op for sessions that were never authenticated.
    pub async fn logout(&self, session: &Session) -> Result<(), AuthError> {
        session.flush().await?;
        Ok(())
    }

    fn provider(&self) -> Result<&OAuthProvider, AuthError> {
        self.provider.as_deref().ok_or(AuthError::ProviderUnavailable)
    }

    async fn establish(
        &self,
        session: &Session,
        account: &Account,
    ) -> Result<SessionIdentity, AuthError> {
        let payload = codec::serialize(account);
        let identity = codec::deserialize(&payload)?;

        session.cycle_id().await?;
        session.insert(SESSION_IDENTITY_KEY, payload).await?;
        Ok(identity)
    }
}
