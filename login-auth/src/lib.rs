//! # login-auth
//!
//! OAuth 2.0 authorization code plumbing for "Login with GitHub":
//! - Provider configuration and authorization URL construction
//! - Anti-forgery state generation, comparison and session binding
//! - The GitHub provider client (code exchange, user profile)
//! - HTTP client building
//!
//! ## Usage
//!
//! ```rust,ignore
//! use login_auth::oauth::{providers::github, AntiForgeryState, Provider, StateStore};
//!
//! let provider = github::Provider::new(provider_config)?;
//! let state = AntiForgeryState::generate();
//! session.put_state(&state).await?;
//! let url = provider.config().authorization_url(&state);
//! ```

pub mod error;
pub mod http;
pub mod oauth;

// Re-export commonly used types
pub use error::{Error, ErrorKind};
