//! Controller for the "Login with GitHub" flow.
//!
//! Both endpoints are reached through browser redirects, so neither requires
//! an authenticated session or custom headers. The only thing tying the two
//! requests together is the session cookie set by `login`.

use crate::params::oauth::CallbackParams;
use crate::{AppState, Error};

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect};
use tower_sessions::Session;

use domain::login;

use log::*;

/// GET /login/github
///
/// Starts a login by redirecting the browser to GitHub's authorization page.
#[utoipa::path(
    get,
    path = "/login/github",
    responses(
        (status = 303, description = "Redirect to GitHub authorization"),
        (status = 500, description = "GitHub client not configured or session store failure"),
    )
)]
pub async fn login(
    session: Session,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    let url = login::begin_login(&session, &app_state.config).await?;
    Ok(Redirect::to(&url))
}

/// GET /callback/github
///
/// Completes a login when GitHub redirects back, then sends the browser on
/// to the landing page with the user's email and name.
#[utoipa::path(
    get,
    path = "/callback/github",
    params(CallbackParams),
    responses(
        (status = 303, description = "Redirect to the landing page with identity claims"),
        (status = 400, description = "GitHub profile could not be fetched"),
        (status = 401, description = "State mismatch or code exchange rejected"),
        (status = 500, description = "Profile undecodable, landing URL invalid or server misconfigured"),
    )
)]
pub async fn callback(
    session: Session,
    State(app_state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Result<impl IntoResponse, Error> {
    if let Some(error) = params.error.as_deref() {
        warn!(
            "GitHub returned an authorization error: {} ({})",
            error,
            params.error_description.as_deref().unwrap_or("no description")
        );
    }

    let url = login::handle_callback(
        &session,
        &app_state.config,
        params.state.as_deref(),
        params.code.as_deref(),
    )
    .await?;
    Ok(Redirect::to(&url))
}
