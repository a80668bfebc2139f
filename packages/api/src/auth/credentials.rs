//! Local username/password verification and account registration.

use std::sync::Arc;

use super::password::{
    burn_verification, hash_password, prepare_burn_verification, verify_password,
};
use crate::models::Account;
use crate::store::AccountStore;
use crate::AuthError;

/// Shortest password accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Checks presented credentials against the account store.
#[derive(Clone)]
pub struct CredentialVerifier {
    store: Arc<dyn AccountStore>,
}

impl CredentialVerifier {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        prepare_burn_verification();
        Self { store }
    }

    /// Look the account up by username and check the password against its hash.
    pub async fn verify(&self, username: &str, password: &str) -> Result<Account, AuthError> {
        let Some(account) = self.store.find_by_username(username.trim()).await? else {
            burn_verification(password);
            return Err(AuthError::NoSuchAccount);
        };

        // Federated-only accounts have no credential to match
        let Some(hash) = account.password_hash.as_deref() else {
            burn_verification(password);
            return Err(AuthError::BadCredential);
        };

        match verify_password(password, hash) {
            Ok(true) => Ok(account),
            Ok(false) => Err(AuthError::BadCredential),
            Err(e) => {
                tracing::error!(account_id = %account.id, "stored password hash unreadable: {}", e);
                Err(AuthError::BadCredential)
            }
        }
    }

    /// Create a local account. Never overwrites an existing username.
    pub async fn register(&self, username: &str, password: &str) -> Result<Account, AuthError> {
        let username = username.trim();

        if username.is_empty() {
            return Err(AuthError::InvalidInput("username is required".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::InvalidInput(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let password_hash = hash_password(password)?;
        self.store.create_local(username, &password_hash).await
    }
}
