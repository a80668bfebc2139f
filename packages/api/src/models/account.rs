//! # Account model
//!
//! Two representations of a user live here:
//!
//! ## [`Account`]
//!
//! The persisted record, owned by the account store. It derives [`sqlx::FromRow`] so
//! the PostgreSQL store can load it straight from a query:
//!
//! - `id`: primary key (`UUID v4`).
//! - `username` / `password_hash`: present for local accounts. The hash is an
//!   Argon2id PHC string.
//! - `federated_subject`: the provider's stable subject identifier, unique across
//!   accounts. `federated_profile` keeps the provider's raw profile as an opaque blob.
//! - `display_name`: taken from the provider profile, if any.
//!
//! An account always has a username with a password hash, a federated subject, or
//! both. Otherwise nothing could ever log into it.
//!
//! ## [`SessionIdentity`]
//!
//! The lightweight subset carried in the session: id, username and display name.
//! It is what protected routes see; callers that need fresh account state must go
//! back to the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Full account record from the store.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub federated_subject: Option<String>,
    pub federated_profile: Option<serde_json::Value>,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// A local account with a username and an already hashed password.
    pub fn local(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: Some(username.into()),
            password_hash: Some(password_hash.into()),
            federated_subject: None,
            federated_profile: None,
            display_name: None,
            created_at: Utc::now(),
        }
    }

    /// A purely federated account: no username, no credential.
    pub fn federated(profile: &super::ExternalProfile) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: None,
            password_hash: None,
            federated_subject: Some(profile.subject.clone()),
            federated_profile: Some(profile.to_blob()),
            display_name: profile.display_name.clone(),
            created_at: Utc::now(),
        }
    }

    /// Whether anything can still authenticate as this account.
    pub fn is_reachable(&self) -> bool {
        let local = self.username.is_some() && self.password_hash.is_some();
        local || self.federated_subject.is_some()
    }

    /// Project the account into the identity kept in the session.
    pub fn to_identity(&self) -> SessionIdentity {
        SessionIdentity {
            id: self.id,
            username: self.username.clone(),
            display_name: self.display_name.clone(),
        }
    }
}

/// Identity reconstructed from the session without a store round trip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SessionIdentity {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl SessionIdentity {
    /// Name to greet the user with: display name, then username.
    pub fn greeting_name(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or("there")
    }
}
