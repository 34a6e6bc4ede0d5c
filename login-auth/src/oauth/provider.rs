//! OAuth provider trait and types.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::Url;

use super::{AccessToken, AntiForgeryState};
use crate::error::{Error, ErrorKind, OAuthErrorKind};

/// Known OAuth login providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    GitHub,
}

impl ProviderKind {
    /// Get the provider identifier string, also used as the `source` marker
    /// on the landing page redirect.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::GitHub => "github",
        }
    }
}

/// The provider endpoints taking part in the authorization code flow.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub authorize_url: Url,
    pub token_url: Url,
    pub user_info_url: Url,
}

impl Endpoints {
    /// Parse the endpoint URLs, failing with `InvalidConfig` on the first malformed one.
    pub fn parse(authorize_url: &str, token_url: &str, user_info_url: &str) -> Result<Self, Error> {
        Ok(Self {
            authorize_url: parse_endpoint(authorize_url)?,
            token_url: parse_endpoint(token_url)?,
            user_info_url: parse_endpoint(user_info_url)?,
        })
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, Error> {
    Url::parse(raw).map_err(|e| Error::new(ErrorKind::OAuth(OAuthErrorKind::InvalidConfig), e))
}

/// Immutable per-request provider configuration.
///
/// Built fresh for every login attempt from the process-wide settings and
/// dropped at the end of the request.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub client_id: String,
    pub client_secret: SecretString,
    /// This application's callback endpoint.
    pub redirect_url: String,
    pub scopes: Vec<String>,
    pub endpoints: Endpoints,
    /// Deadline applied to each outbound call.
    pub timeout: Duration,
}

impl ProviderConfig {
    /// Build the provider authorization URL the browser is redirected to.
    ///
    /// Query pairs are appended after any query the configured endpoint
    /// already carries and are form-encoded once, on serialization.
    pub fn authorization_url(&self, state: &AntiForgeryState) -> String {
        let mut url = self.endpoints.authorize_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_url)
            .append_pair("response_type", "code")
            .append_pair("scope", &self.scopes.join(" "))
            .append_pair("state", state.as_str());
        url.into()
    }

    pub(crate) fn client_secret(&self) -> &str {
        self.client_secret.expose_secret()
    }
}

/// Identity claims normalized from a provider's user-info document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Login handle.
    pub login: String,
    /// Display name.
    pub name: String,
    pub email: String,
    /// Company or organisation the user lists.
    pub affiliation: String,
    /// Profile URL.
    pub url: String,
}

/// Trait for OAuth 2.0 login providers.
///
/// Implementations handle the two outbound legs of the authorization code flow:
/// - Authorization code exchange for an access token
/// - User profile retrieval with that token
#[async_trait]
pub trait Provider: Send + Sync {
    /// Get the provider kind.
    fn provider(&self) -> ProviderKind;

    /// The configuration this provider was built from.
    fn config(&self) -> &ProviderConfig;

    /// Exchange an authorization code for an access token.
    ///
    /// Fails with `TokenExchangeFailed` on network errors, timeouts,
    /// non-success responses and OAuth error bodies.
    async fn exchange_code(&self, code: &str) -> Result<AccessToken, Error>;

    /// Fetch the authenticated user's profile.
    ///
    /// Fails with `ProfileFetchFailed` when the call or the body read fails or
    /// the status is not a success, and with `InvalidProfile` when the body
    /// does not decode.
    async fn get_user_profile(&self, token: &AccessToken) -> Result<UserProfile, Error>;
}
