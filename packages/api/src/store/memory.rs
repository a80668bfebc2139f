use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::AccountStore;
use crate::models::{Account, ExternalProfile};
use crate::AuthError;

#[derive(Debug, Default)]
struct Tables {
    accounts: HashMap<Uuid, Account>,
    by_username: HashMap<String, Uuid>,
    by_subject: HashMap<String, Uuid>,
}

impl Tables {
    fn insert(&mut self, account: Account) -> Account {
        if let Some(username) = &account.username {
            self.by_username.insert(username.clone(), account.id);
        }
        if let Some(subject) = &account.federated_subject {
            self.by_subject.insert(subject.clone(), account.id);
        }
        self.accounts.insert(account.id, account.clone());
        account
    }

    fn lookup(&self, id: Option<&Uuid>) -> Option<Account> {
        id.and_then(|id| self.accounts.get(id)).cloned()
    }
}

/// In-memory account store for testing and database-less development.
///
/// All three indexes sit behind one lock, so every operation (find-or-create
/// included) is a single critical section.
#[derive(Clone, Debug, Default)]
pub struct MemoryAccountStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.tables.read().await.accounts.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AuthError> {
        Ok(self.tables.read().await.lookup(Some(&id)))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AuthError> {
        let tables = self.tables.read().await;
        Ok(tables.lookup(tables.by_username.get(username)))
    }

    async fn find_by_federated_subject(
        &self,
        subject: &str,
    ) -> Result<Option<Account>, AuthError> {
        let tables = self.tables.read().await;
        Ok(tables.lookup(tables.by_subject.get(subject)))
    }

    async fn find_or_create_federated(
        &self,
        profile: &ExternalProfile,
    ) -> Result<Account, AuthError> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables.lookup(tables.by_subject.get(&profile.subject)) {
            return Ok(existing);
        }
        Ok(tables.insert(Account::federated(profile)))
    }

    async fn create_local(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<Account, AuthError> {
        let mut tables = self.tables.write().await;
        if tables.by_username.contains_key(username) {
            return Err(AuthError::DuplicateUsername(username.to_string()));
        }
        Ok(tables.insert(Account::local(username, password_hash)))
    }
}
