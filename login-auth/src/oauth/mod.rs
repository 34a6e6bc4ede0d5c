//! OAuth 2.0 authorization code flow infrastructure.
//!
//! Provides the provider configuration, anti-forgery state handling and the
//! provider client used to log a browser session in with GitHub.

mod provider;
mod state;
mod token;

pub mod providers;

pub use provider::{Endpoints, Provider, ProviderConfig, ProviderKind, UserProfile};
pub use state::{AntiForgeryState, StateStore, STATE_KEY};
pub use token::AccessToken;
