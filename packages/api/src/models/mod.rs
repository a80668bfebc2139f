//! Data models for the authentication core.

mod account;
mod profile;

pub use account::{Account, SessionIdentity};
pub use profile::ExternalProfile;
