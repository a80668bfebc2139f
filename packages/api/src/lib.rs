//! # API crate: the authentication core behind the documentation site
//!
//! Everything needed to decide "is this request authenticated, and as whom?" lives
//! here; the `web` crate only wires it to HTTP routes.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | Credential verification, federated OAuth (PKCE), session codec and the [`Authenticator`] orchestrator |
//! | [`db`] | PostgreSQL connection pool and migrations |
//! | [`models`] | [`Account`], [`SessionIdentity`] and the provider [`ExternalProfile`] |
//! | [`settings`] | [`Settings`] loaded from the environment |
//! | [`store`] | The [`AccountStore`] trait with in-memory and PostgreSQL implementations |
//!
//! ## Flows
//!
//! - **Local**: `register` hashes the password with Argon2id and creates the account;
//!   `login_local` verifies it. Both end with the identity written into the session.
//! - **Federated**: `begin_federated` stores CSRF state + PKCE verifier in the session
//!   and returns the provider URL; `complete_federated` checks the state, exchanges
//!   the code, and finds or creates the account keyed on the provider's subject id.
//! - **Logout**: `logout` flushes the session so its token is useless afterwards.

pub mod auth;
pub mod db;
mod error;
pub mod models;
pub mod settings;
pub mod store;

pub use auth::{AuthState, Authenticator};
pub use error::AuthError;
pub use models::{Account, ExternalProfile, SessionIdentity};
pub use settings::Settings;
pub use store::AccountStore;
