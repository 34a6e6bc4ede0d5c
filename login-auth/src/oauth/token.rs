//! OAuth access token type.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

/// Access token returned by the authorization code exchange.
///
/// Lives only for the duration of the callback request that obtained it.
#[derive(Clone)]
pub struct AccessToken {
    secret: SecretString,
    /// Token type (GitHub answers "bearer").
    pub token_type: String,
    /// Granted scopes.
    pub scopes: Vec<String>,
}

impl AccessToken {
    pub fn new(secret: String, token_type: String, scopes: Vec<String>) -> Self {
        Self {
            secret: SecretString::new(secret),
            token_type,
            scopes,
        }
    }

    /// The raw credential, for use in an `Authorization: Bearer` header.
    pub fn secret(&self) -> &str {
        self.secret.expose_secret()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("scopes", &self.scopes)
            .finish()
    }
}
