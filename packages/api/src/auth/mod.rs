//! Authentication: local credentials, federated OAuth, and the session codec.

mod config;
mod credentials;
mod federated;
mod orchestrator;
mod password;
mod provider;
pub mod session;

pub use config::OAuthConfig;
pub use credentials::{CredentialVerifier, MIN_PASSWORD_LEN};
pub use federated::FederatedResolver;
pub use orchestrator::{AuthState, Authenticator};
pub use password::{hash_password, verify_password};
pub use provider::{CallbackParams, OAuthProvider, PendingAuthorization};
pub use session::{SessionPayload, SESSION_IDENTITY_KEY, SESSION_PENDING_OAUTH_KEY};
