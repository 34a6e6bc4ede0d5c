//! OAuth authentication gateway.
//!
//! Re-exports OAuth types from login-auth and provides provider-specific clients.

pub mod github;

// Re-export OAuth types from login-auth
pub use login_auth::oauth::{
    AccessToken, AntiForgeryState, Endpoints, Provider, ProviderConfig, ProviderKind, StateStore,
    UserProfile,
};
