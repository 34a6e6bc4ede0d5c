//! OAuth provider implementations.

pub mod github;
