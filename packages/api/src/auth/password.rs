//! # Password hashing and verification: Argon2id
//!
//! - [`hash_password`]: generates a random per-account salt via [`OsRng`], hashes the
//!   plaintext with the default Argon2id parameters and returns a PHC-format string
//!   (e.g. `$argon2id$v=19$m=19456,t=2,p=1$...`). That string is what the account
//!   store keeps in `password_hash`.
//!
//! - [`verify_password`]: parses a PHC-format hash and checks the plaintext against
//!   it. The comparison inside `argon2` is constant time. Returns `Ok(true)` on match,
//!   `Ok(false)` on mismatch and `Err` if the stored hash is malformed.
//!
//! - [`burn_verification`]: runs a verification against a throwaway hash so that a
//!   login for an unknown username costs as much as one for a known username.

use std::sync::OnceLock;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::AuthError;

/// Hash a password using Argon2id. Returns a PHC-format string.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::PasswordHash(format!("hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Verify a password against a PHC-format hash string.
///
/// A mismatch is `Ok(false)`. `Err` means the stored hash itself is unusable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AuthError::PasswordHash(format!("unreadable stored hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

fn dummy_hash() -> Option<&'static str> {
    DUMMY_HASH
        .get_or_init(|| hash_password("not-a-real-password").ok())
        .as_deref()
}

/// Build the throwaway hash up front so the first unknown-user login is not slower
/// than the rest.
pub fn prepare_burn_verification() {
    if dummy_hash().is_none() {
        tracing::warn!("could not prepare dummy password hash");
    }
}

#[cfg(test)]
pub(super) fn burn_verification_ready() -> bool {
    DUMMY_HASH.get().is_some_and(Option::is_some)
}

pub fn burn_verification(password: &str) {
    if let Some(hash) = dummy_hash() {
        let _ = verify_password(password, hash);
    }
}
