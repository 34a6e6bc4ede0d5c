//! The "Login with GitHub" flow.
//!
//! `web` calls into `login` for the two browser-facing steps; the OAuth
//! protocol details live in `login-auth` and are reached through `gateway`.

pub use gateway::oauth::{ProviderKind, UserProfile};

pub mod error;
pub mod login;

pub mod gateway;
