//! "Login with GitHub" across two browser requests.
//!
//! `begin_login` binds a fresh anti-forgery state to the browser session and
//! returns the GitHub authorization URL. `handle_callback` runs when GitHub
//! redirects back: it checks the state, exchanges the code, fetches the
//! profile and returns the landing page URL carrying the identity claims.
//! Each step is terminal on failure; nothing is retried.

use crate::error::{DomainErrorKind, Error, ExternalErrorKind, InternalErrorKind};
use crate::gateway::oauth::{
    github, AntiForgeryState, Provider, ProviderConfig, ProviderKind, StateStore, UserProfile,
};
use log::*;
use service::config::Config;
use url::Url;

/// Start a login: store a new state in the session and return the provider
/// authorization URL to redirect the browser to.
///
/// Any state left over from an earlier attempt in the same session is overwritten.
pub async fn begin_login(session: &impl StateStore, config: &Config) -> Result<String, Error> {
    let provider_config = github::provider_config(config)?;
    authorization_redirect(session, &provider_config).await
}

/// Finish a login started by `begin_login`.
///
/// `state` and `code` are the query parameters of the provider's redirect.
/// Returns the landing page URL with `email`, `name` and `source` appended.
pub async fn handle_callback(
    session: &impl StateStore,
    config: &Config,
    state: Option<&str>,
    code: Option<&str>,
) -> Result<String, Error> {
    verify_state(session, state).await?;

    let provider = github::new_provider(config)?;
    complete_login(&provider, code, config.login_landing_url()).await
}

async fn authorization_redirect(
    session: &impl StateStore,
    provider_config: &ProviderConfig,
) -> Result<String, Error> {
    let state = AntiForgeryState::generate();

    session
        .put_state(&state)
        .await
        .inspect_err(|e| warn!("Failed to store OAuth state in session: {:?}", e))?;

    info!("Redirecting browser to GitHub for authorization");
    Ok(provider_config.authorization_url(&state))
}

/// Consume the session's state and compare it with the one the provider echoed back.
///
/// The stored value is removed whatever the outcome, so a state is usable once.
async fn verify_state(session: &impl StateStore, returned: Option<&str>) -> Result<(), Error> {
    let stored = session.take_state().await.inspect_err(|e| {
        warn!("Failed to read OAuth state from session: {:?}", e);
    })?;

    match (stored, returned) {
        (Some(stored), Some(returned)) if stored.matches(returned) => {
            debug!("OAuth state verified");
            Ok(())
        }
        (None, _) => {
            warn!("OAuth callback without a login in progress for this session");
            Err(Error::external(ExternalErrorKind::StateMismatch))
        }
        (Some(_), None) => {
            warn!("OAuth callback is missing the state parameter");
            Err(Error::external(ExternalErrorKind::StateMismatch))
        }
        (Some(_), Some(_)) => {
            warn!("OAuth callback state does not match the session");
            Err(Error::external(ExternalErrorKind::StateMismatch))
        }
    }
}

async fn complete_login<P: Provider>(
    provider: &P,
    code: Option<&str>,
    landing_url: &str,
) -> Result<String, Error> {
    let code = code.filter(|code| !code.is_empty()).ok_or_else(|| {
        warn!("OAuth callback is missing the authorization code");
        Error::external(ExternalErrorKind::TokenExchange)
    })?;

    let token = provider.exchange_code(code).await?;
    let profile = provider.get_user_profile(&token).await?;

    info!("GitHub user {} logged in", profile.login);
    landing_redirect(landing_url, &profile, provider.provider())
}

/// Append the identity claims to the landing page URL.
///
/// Query pairs already on `landing_url` are kept ahead of the appended
/// `email`, `name` and `source` pairs.
pub fn landing_redirect(
    landing_url: &str,
    profile: &UserProfile,
    source: ProviderKind,
) -> Result<String, Error> {
    let mut url = Url::parse(landing_url).map_err(|e| {
        error!("Invalid login landing URL {landing_url}: {e}");
        Error {
            source: Some(Box::new(e)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::RedirectBuild),
        }
    })?;

    url.query_pairs_mut()
        .append_pair("email", &profile.email)
        .append_pair("name", &profile.name)
        .append_pair("source", source.as_str());

    Ok(url.into())
}
