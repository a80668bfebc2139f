//! PostgreSQL account store.
//!
//! Uniqueness of `username` and `federated_subject` is enforced by the schema in
//! `migrations/`, so both write paths are one statement each.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::AccountStore;
use crate::models::{Account, ExternalProfile};
use crate::AuthError;

const ACCOUNT_COLUMNS: &str =
    "id, username, password_hash, federated_subject, federated_profile, display_name, created_at";

#[derive(Clone, Debug)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<Account>, AuthError> {
        let query = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE {column} = $1");
        let account = sqlx::query_as::<_, Account>(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AuthError> {
        let query = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1");
        let account = sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AuthError> {
        self.find_one("username", username).await
    }

    async fn find_by_federated_subject(
        &self,
        subject: &str,
    ) -> Result<Option<Account>, AuthError> {
        self.find_one("federated_subject", subject).await
    }

    async fn find_or_create_federated(
        &self,
        profile: &ExternalProfile,
    ) -> Result<Account, AuthError> {
        let candidate = Account::federated(profile);

        // The no-op DO UPDATE makes RETURNING yield the existing row on conflict.
        let query = format!(
            r#"
            INSERT INTO accounts (id, federated_subject, federated_profile, display_name, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (federated_subject)
            DO UPDATE SET federated_subject = EXCLUDED.federated_subject
            RETURNING {ACCOUNT_COLUMNS}
            "#
        );

        let account = sqlx::query_as::<_, Account>(&query)
            .bind(candidate.id)
            .bind(&candidate.federated_subject)
            .bind(&candidate.federated_profile)
            .bind(&candidate.display_name)
            .bind(candidate.created_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(account)
    }

    async fn create_local(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<Account, AuthError> {
        let candidate = Account::local(username, password_hash);

        let query = format!(
            r#"
            INSERT INTO accounts (id, username, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Account>(&query)
            .bind(candidate.id)
            .bind(username)
            .bind(password_hash)
            .bind(candidate.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    AuthError::DuplicateUsername(username.to_string())
                }
                other => other.into(),
            })
    }
}
