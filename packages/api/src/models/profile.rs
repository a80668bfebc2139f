//! Profile returned by the external identity provider.

use serde_json::{Map, Value};

use crate::AuthError;

/// Provider profile, validated at the resolver boundary.
///
/// Only `subject` is load-bearing: accounts are matched on it and nothing else.
/// Whatever else the provider sent is kept in `extra` untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalProfile {
    pub subject: String,
    pub display_name: Option<String>,
    pub extra: Map<String, Value>,
}

impl ExternalProfile {
    pub fn new(subject: impl Into<String>, display_name: Option<String>) -> Self {
        Self {
            subject: subject.into(),
            display_name,
            extra: Map::new(),
        }
    }

    /// Build a profile from a userinfo response.
    ///
    /// The subject comes from the OpenID `sub` claim, or from `id` for providers
    /// (GitHub, Google's v2 endpoint) that use that instead. Numeric ids are
    /// accepted and stringified.
    pub fn from_claims(claims: Value) -> Result<Self, AuthError> {
        let Value::Object(mut fields) = claims else {
            return Err(AuthError::MalformedProfile(
                "userinfo response is not an object".to_string(),
            ));
        };

        let subject = match fields.remove("sub").or_else(|| fields.remove("id")) {
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            Some(_) => {
                return Err(AuthError::MalformedProfile(
                    "subject is not a string".to_string(),
                ))
            }
            None => {
                return Err(AuthError::MalformedProfile(
                    "missing subject identifier".to_string(),
                ))
            }
        };

        let display_name = ["name", "login"]
            .iter()
            .find_map(|key| fields.get(*key).and_then(Value::as_str))
            .map(str::to_string);

        let profile = Self {
            subject,
            display_name,
            extra: fields,
        };
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> Result<(), AuthError> {
        if self.subject.trim().is_empty() {
            return Err(AuthError::MalformedProfile(
                "empty subject identifier".to_string(),
            ));
        }
        Ok(())
    }

    /// The opaque blob persisted alongside the account.
    pub fn to_blob(&self) -> Value {
        let mut blob = self.extra.clone();
        blob.insert("sub".to_string(), Value::String(self.subject.clone()));
        Value::Object(blob)
    }
}
