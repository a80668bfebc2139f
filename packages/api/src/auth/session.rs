//! Session keys and the codec between accounts and session payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Account, SessionIdentity};
use crate::AuthError;

/// Key the serialized identity is stored under.
pub const SESSION_IDENTITY_KEY: &str = "identity";

/// Key holding the in-flight federated handshake (CSRF state + PKCE verifier).
pub const SESSION_PENDING_OAUTH_KEY: &str = "oauth_pending";

/// What actually goes into the session store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionPayload(pub Value);

/// Extract the minimal identity subset. Never includes the password hash or the
/// federated profile blob.
pub fn serialize(account: &Account) -> SessionPayload {
    let identity = account.to_identity();
    // SessionIdentity is plain strings and a uuid, serializing it cannot fail
    SessionPayload(serde_json::to_value(identity).unwrap_or(Value::Null))
}

/// Rebuild the identity without touching the account store.
pub fn deserialize(payload: &SessionPayload) -> Result<SessionIdentity, AuthError> {
    serde_json::from_value(payload.0.clone())
        .map_err(|e| AuthError::CorruptSession(e.to_string()))
}
