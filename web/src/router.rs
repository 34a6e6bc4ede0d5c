use crate::{
    controller::{health_check_controller, oauth_controller},
    AppState,
};
use axum::{routing::get, Router};

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI document. To be a part
// of the rendered document, a path must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "GitHub Login API"
        ),
        paths(
            health_check_controller::health_check,
            oauth_controller::login,
            oauth_controller::callback,
        ),
        tags(
            (name = "github_login", description = "Login with GitHub via the OAuth2 authorization code flow")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(oauth_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi2.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

/// Routes for the GitHub login flow. Neither requires authentication; the
/// browser reaches both through redirects.
fn oauth_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/login/github", get(oauth_controller::login))
        .route("/callback/github", get(oauth_controller::callback))
        .with_state(app_state)
}
