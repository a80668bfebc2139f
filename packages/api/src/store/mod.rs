//! # Account store
//!
//! [`AccountStore`] is the only way the authentication core touches persisted
//! accounts. Two implementations live in sibling modules:
//!
//! | Store | Module | Use |
//! |-------|--------|-----|
//! | [`MemoryAccountStore`] | [`memory`] | Tests and local development without a database. |
//! | [`PgAccountStore`] | [`postgres`] | PostgreSQL via sqlx, used whenever `DATABASE_URL` is set. |
//!
//! ## Atomicity
//!
//! [`find_or_create_federated`](AccountStore::find_or_create_federated) must be a
//! single atomic operation in the store. Callers never read and then write: two
//! concurrent first logins with the same subject end up on the same account.
//! [`create_local`](AccountStore::create_local) likewise relies on the store's
//! uniqueness guarantee and reports [`AuthError::DuplicateUsername`] instead of
//! overwriting.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Account, ExternalProfile};
use crate::AuthError;

pub mod memory;
pub mod postgres;

pub use memory::MemoryAccountStore;
pub use postgres::PgAccountStore;

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AuthError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AuthError>;

    async fn find_by_federated_subject(
        &self,
        subject: &str,
    ) -> Result<Option<Account>, AuthError>;

    /// Return the account linked to `profile.subject`, creating it if there is none.
    /// An existing account is returned unchanged.
    async fn find_or_create_federated(
        &self,
        profile: &ExternalProfile,
    ) -> Result<Account, AuthError>;

    /// Insert a new local account. Fails with `DuplicateUsername` if taken.
    async fn create_local(&self, username: &str, password_hash: &str)
        -> Result<Account, AuthError>;
}
