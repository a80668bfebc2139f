//! OAuth provider configuration, built from [`Settings`].

use std::time::Duration;

use oauth2::{AuthUrl, ClientId, ClientSecret, RedirectUrl, Scope, TokenUrl};
use reqwest::Url;

use crate::settings::Settings;

/// OAuth provider configuration.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: ClientId,
    pub client_secret: ClientSecret,
    pub auth_url: AuthUrl,
    pub token_url: TokenUrl,
    pub userinfo_url: Url,
    pub redirect_url: RedirectUrl,
    pub scopes: Vec<Scope>,
    pub timeout: Duration,
}

impl OAuthConfig {
    /// Provider config from settings. `Ok(None)` when no client credentials are
    /// configured, which disables federated login.
    pub fn from_settings(settings: &Settings) -> Result<Option<Self>, String> {
        let (Some(client_id), Some(client_secret)) = (
            settings.client_id.as_deref().filter(|s| !s.is_empty()),
            settings.client_secret.as_deref().filter(|s| !s.is_empty()),
        ) else {
            return Ok(None);
        };

        Ok(Some(Self {
            client_id: ClientId::new(client_id.to_string()),
            client_secret: ClientSecret::new(client_secret.to_string()),
            auth_url: AuthUrl::new(settings.auth_url.clone())
                .map_err(|e| format!("AUTH_URL: {}", e))?,
            token_url: TokenUrl::new(settings.token_url.clone())
                .map_err(|e| format!("TOKEN_URL: {}", e))?,
            userinfo_url: Url::parse(&settings.userinfo_url)
                .map_err(|e| format!("USERINFO_URL: {}", e))?,
            redirect_url: RedirectUrl::new(settings.callback_url.clone())
                .map_err(|e| format!("CALLBACK_URL: {}", e))?,
            scopes: settings
                .scopes
                .split_whitespace()
                .map(|s| Scope::new(s.to_string()))
                .collect(),
            timeout: Duration::from_secs(settings.provider_timeout_secs.max(1)),
        }))
    }
}
