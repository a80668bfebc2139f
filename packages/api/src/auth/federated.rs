//! Federated identity resolution: provider profile → account.

use std::sync::Arc;

use crate::models::{Account, ExternalProfile};
use crate::store::AccountStore;
use crate::AuthError;

/// Maps a provider profile onto exactly one account, keyed on the subject id.
#[derive(Clone)]
pub struct FederatedResolver {
    store: Arc<dyn AccountStore>,
}

impl FederatedResolver {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    /// Find the account linked to this profile, or create a federated-only one.
    ///
    /// Issues a single atomic store call; repeated or concurrent logins with the
    /// same subject always land on the same account.
    pub async fn resolve_or_create(&self, profile: &ExternalProfile) -> Result<Account, AuthError> {
        profile.validate()?;

        let account = self.store.find_or_create_federated(profile).await?;
        tracing::debug!(account_id = %account.id, "resolved federated identity");
        Ok(account)
    }
}
