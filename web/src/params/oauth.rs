use serde::Deserialize;
use utoipa::IntoParams;

/// Query parameters GitHub appends when redirecting back to the callback.
///
/// Every field is optional so that an incomplete redirect reaches the login
/// flow and is rejected there with the matching status.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CallbackParams {
    /// Anti-forgery state issued when the login started.
    pub state: Option<String>,
    /// Authorization code to exchange for an access token.
    pub code: Option<String>,
    /// Set by GitHub instead of `code` when the user denies access.
    pub error: Option<String>,
    pub error_description: Option<String>,
}
