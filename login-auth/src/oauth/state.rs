//! CSRF state management for OAuth flows.

use std::fmt;

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::Rng;
use subtle::ConstantTimeEq;
use tower_sessions::Session;

use crate::error::{Error, ErrorKind, SessionErrorKind};

/// Session key the anti-forgery state is stored under.
pub const STATE_KEY: &str = "state";

/// Single-use anti-forgery token binding a provider callback to the browser
/// session that started the login.
#[derive(Clone, PartialEq, Eq)]
pub struct AntiForgeryState(String);

impl AntiForgeryState {
    /// Generate a cryptographically random state token.
    ///
    /// 32 random bytes, base64url encoded without padding (43 characters).
    pub fn generate() -> Self {
        let random_bytes: [u8; 32] = rand::thread_rng().gen();
        Self(URL_SAFE_NO_PAD.encode(random_bytes))
    }

    /// Wrap a state value read back from a session.
    pub fn from_string(state: String) -> Self {
        Self(state)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare against the `state` a provider echoed back, in constant time.
    pub fn matches(&self, candidate: &str) -> bool {
        self.0.as_bytes().ct_eq(candidate.as_bytes()).into()
    }
}

impl fmt::Debug for AntiForgeryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AntiForgeryState([REDACTED])")
    }
}

/// Per-browser-session storage for the anti-forgery state.
///
/// Implementations must persist `put_state` before returning so the value
/// survives until the provider redirects back, and `take_state` must remove
/// the value it returns so a state can never be presented twice.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Store the state, overwriting any prior value, and persist the session.
    async fn put_state(&self, state: &AntiForgeryState) -> Result<(), Error>;

    /// Read and remove the stored state.
    ///
    /// # Returns
    ///
    /// `Some(AntiForgeryState)` if a login was started in this session, `None` otherwise.
    async fn take_state(&self) -> Result<Option<AntiForgeryState>, Error>;
}

#[async_trait]
impl StateStore for Session {
    async fn put_state(&self, state: &AntiForgeryState) -> Result<(), Error> {
        self.insert(STATE_KEY, state.as_str())
            .await
            .map_err(|e| Error::new(ErrorKind::Session(SessionErrorKind::Write), e))?;
        self.save()
            .await
            .map_err(|e| Error::new(ErrorKind::Session(SessionErrorKind::Write), e))
    }

    async fn take_state(&self) -> Result<Option<AntiForgeryState>, Error> {
        let state = self
            .remove::<String>(STATE_KEY)
            .await
            .map_err(|e| Error::new(ErrorKind::Session(SessionErrorKind::Read), e))?;

        // The session layer only persists changes on successful responses, so
        // the removal is saved here before any later step can fail.
        if state.is_some() {
            self.save()
                .await
                .map_err(|e| Error::new(ErrorKind::Session(SessionErrorKind::Write), e))?;
        }
        Ok(state.map(AntiForgeryState::from_string))
    }
}
