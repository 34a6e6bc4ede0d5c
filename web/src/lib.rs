//! HTTP surface for the GitHub login flow.
//!
//! Wires the login and callback controllers into an axum router behind an
//! in-memory cookie session store and serves it.

use axum::http::{HeaderValue, Method};
use axum::Router;
use log::*;
use service::config::Config;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

pub use error::{Error, Result};
pub use service::AppState;

mod controller;
mod error;
mod params;
pub mod router;

/// Bind the configured interface and port and serve until the process stops.
pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let interface = app_state.config.interface.as_deref().unwrap_or("127.0.0.1");
    let listen_addr = format!("{}:{}", interface, app_state.config.port);

    info!("Server starting... listening for connections on http://{listen_addr}");

    let listener = TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, app(app_state)).await
}

/// The complete application: routes plus the session and CORS layers.
pub fn app(app_state: AppState) -> Router {
    let session_layer = session_layer(&app_state.config);
    let cors_layer = cors_layer(&app_state.config);

    router::define_routes(app_state)
        .layer(session_layer)
        .layer(cors_layer)
}

// The provider redirects back cross-site, so the cookie must be sent on
// top-level navigations: SameSite=Lax, never Strict.
fn session_layer(config: &Config) -> SessionManagerLayer<MemoryStore> {
    let session_store = MemoryStore::default();
    SessionManagerLayer::new(session_store)
        .with_secure(config.is_production())
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::seconds(
            config.backend_session_expiry_seconds as i64,
        )))
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| {
            origin
                .parse::<HeaderValue>()
                .inspect_err(|_| warn!("Ignoring invalid allowed origin: {origin}"))
                .ok()
        })
        .collect();

    CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_credentials(true)
        .allow_origin(AllowOrigin::list(origins))
}
