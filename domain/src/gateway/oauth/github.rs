//! GitHub OAuth client.
//!
//! Builds the per-request GitHub provider configuration from the process-wide `Config`.

use std::time::Duration;

use log::*;
use login_auth::oauth::providers::github::{Provider as GitHubProvider, DEFAULT_SCOPES};
use secrecy::SecretString;
use service::config::Config;

use super::{Endpoints, ProviderConfig};
use crate::error::{Error, InternalErrorKind};

/// Build a fresh, immutable GitHub provider configuration.
///
/// The redirect URL is this application's callback endpoint and the scopes
/// are fixed to profile plus listed-repository access.
pub fn provider_config(config: &Config) -> Result<ProviderConfig, Error> {
    let client_id = config.github_client_id().ok_or_else(|| {
        error!("GitHub OAuth client ID not configured");
        Error::internal(InternalErrorKind::Config)
    })?;

    let client_secret = config.github_client_secret().ok_or_else(|| {
        error!("GitHub OAuth client secret not configured");
        Error::internal(InternalErrorKind::Config)
    })?;

    let endpoints = Endpoints::parse(
        config.github_authorize_url(),
        config.github_token_url(),
        config.github_user_url(),
    )
    .inspect_err(|e| error!("Invalid GitHub endpoint configuration: {:?}", e))?;

    Ok(ProviderConfig {
        client_id,
        client_secret: SecretString::new(client_secret),
        redirect_url: config.github_redirect_uri().to_string(),
        scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
        endpoints,
        timeout: Duration::from_secs(config.provider_timeout_secs),
    })
}

/// Create a new GitHub OAuth provider from config.
pub fn new_provider(config: &Config) -> Result<GitHubProvider, Error> {
    Ok(GitHubProvider::new(provider_config(config)?)?)
}
