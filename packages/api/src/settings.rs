//! Runtime configuration.
//!
//! Values come from built-in defaults overlaid with the process environment (after
//! `dotenvy` has loaded any `.env` file). Variable names are the upper-cased field
//! names: `SECRET`, `CLIENT_ID`, `CLIENT_SECRET`, `CALLBACK_URL`, `PORT`, and so on.

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Session secrets shorter than this are rejected by the cookie signer.
pub const MIN_SECRET_LEN: usize = 64;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Session cookie signing secret.
    pub secret: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub callback_url: String,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    /// Space separated.
    pub scopes: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub provider_timeout_secs: u64,
    pub secure_cookies: bool,
}

impl Settings {
    /// Load settings from `.env` and the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::build(Environment::default())
    }

    /// Load settings from an explicit set of variables instead of the environment.
    pub fn from_vars<K, I>(vars: I) -> Result<Self, ConfigError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, String)>,
    {
        let source = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v))
            .collect::<config::Map<String, String>>();
        Self::build(Environment::default().source(Some(source)))
    }

    fn build(env: Environment) -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .set_default("callback_url", "http://localhost:3000/auth/external/callback")?
            .set_default("auth_url", "https://accounts.google.com/o/oauth2/v2/auth")?
            .set_default("token_url", "https://oauth2.googleapis.com/token")?
            .set_default("userinfo_url", "https://www.googleapis.com/oauth2/v3/userinfo")?
            .set_default("scopes", "profile")?
            .set_default("port", 3000)?
            .set_default("provider_timeout_secs", 10)?
            .set_default("secure_cookies", false)?
            .add_source(env)
            .build()?
            .try_deserialize()?;

        if settings.secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::Message(format!(
                "SECRET must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        Ok(settings)
    }
}
