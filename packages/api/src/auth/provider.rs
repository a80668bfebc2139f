//! # External OAuth 2.0 provider
//!
//! Implements the Authorization Code flow with PKCE against whichever provider
//! [`OAuthConfig`] points at (Google by default).
//!
//! ## Flow
//!
//! 1. **[`authorize_url`](OAuthProvider::authorize_url)** builds the provider URL with
//!    the configured scopes, a random CSRF state and a PKCE challenge. The state and
//!    verifier come back as a [`PendingAuthorization`] for the caller to keep in the
//!    session store until the callback arrives.
//!
//! 2. **[`fetch_profile`](OAuthProvider::fetch_profile)** is called from the callback
//!    handler. It exchanges the code + PKCE verifier for an access token, fetches the
//!    userinfo document and turns it into an [`ExternalProfile`]. The whole step is
//!    bounded by the configured timeout; a stalled provider fails the flow instead of
//!    holding the request open.

use oauth2::basic::BasicClient;
use oauth2::{
    AuthorizationCode, CsrfToken, EndpointNotSet, EndpointSet, PkceCodeChallenge,
    PkceCodeVerifier, TokenResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::config::OAuthConfig;
use crate::models::ExternalProfile;
use crate::AuthError;

/// OAuth client type with auth URL and token URL set.
type ConfiguredClient = oauth2::Client<
    oauth2::basic::BasicErrorResponse,
    oauth2::basic::BasicTokenResponse,
    oauth2::basic::BasicTokenIntrospectionResponse,
    oauth2::StandardRevocableToken,
    oauth2::basic::BasicRevocationErrorResponse,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

/// State carried from step 1 to step 2 through the session store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingAuthorization {
    pub csrf_state: String,
    pub pkce_verifier: String,
}

/// Query parameters the provider appends to the callback URL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

pub struct OAuthProvider {
    config: OAuthConfig,
    http: reqwest::Client,
}

impl OAuthProvider {
    pub fn new(config: OAuthConfig) -> Result<Self, AuthError> {
        // Token exchange must not follow redirects
        let http = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(config.timeout)
            .build()
            .map_err(|e| AuthError::ProviderExchangeFailed(e.to_string()))?;

        Ok(Self { config, http })
    }

    fn create_client(&self) -> ConfiguredClient {
        BasicClient::new(self.config.client_id.clone())
            .set_client_secret(self.config.client_secret.clone())
            .set_auth_uri(self.config.auth_url.clone())
            .set_token_uri(self.config.token_url.clone())
            .set_redirect_uri(self.config.redirect_url.clone())
    }

    /// Generate the authorization URL with PKCE.
    pub fn authorize_url(&self) -> (String, PendingAuthorization) {
        let client = self.create_client();
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let (auth_url, csrf_state) = client
            .authorize_url(CsrfToken::new_random)
            .add_scopes(self.config.scopes.iter().cloned())
            .set_pkce_challenge(pkce_challenge)
            .url();

        let pending = PendingAuthorization {
            csrf_state: csrf_state.secret().clone(),
            pkce_verifier: pkce_verifier.secret().clone(),
        };
        (auth_url.to_string(), pending)
    }

    /// Exchange the authorization code for a token and fetch the user's profile.
    pub async fn fetch_profile(
        &self,
        code: &str,
        pending: PendingAuthorization,
    ) -> Result<ExternalProfile, AuthError> {
        tokio::time::timeout(self.config.timeout, self.exchange(code, pending))
            .await
            .map_err(|_| {
                AuthError::ProviderExchangeFailed(format!(
                    "no answer within {:?}",
                    self.config.timeout
                ))
            })?
    }

    async fn exchange(
        &self,
        code: &str,
        pending: PendingAuthorization,
    ) -> Result<ExternalProfile, AuthError> {
        let token_result = self
            .create_client()
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .set_pkce_verifier(PkceCodeVerifier::new(pending.pkce_verifier))
            .request_async(&self.http)
            .await
            .map_err(|e| AuthError::ProviderExchangeFailed(format!("token exchange: {}", e)))?;

        let access_token = token_result.access_token().secret();

        let response = self
            .http
            .get(self.config.userinfo_url.clone())
            .bearer_auth(access_token)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AuthError::ProviderExchangeFailed(format!("userinfo: {}", e)))?;

        let claims: Value = response
            .json()
            .await
            .map_err(|e| AuthError::MalformedProfile(e.to_string()))?;

        ExternalProfile::from_claims(claims)
    }
}
