//! Error types for the `domain` layer.
use login_auth::error::{
    Error as LoginAuthError, ErrorKind as LoginAuthErrorKind, OAuthErrorKind, SessionErrorKind,
};
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field is used to hold the original error that caused
/// the domain error. `login_auth` errors are translated into domain errors here, and
/// `web` uses the resulting `error_kind` to pick the HTTP status returned to the browser.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
}

/// Failures of this server or its configuration.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    /// Provider credentials or endpoints are missing or malformed.
    Config,
    /// The anti-forgery state could not be persisted in the session.
    SessionWrite,
    /// The configured landing page URL does not parse.
    RedirectBuild,
    Other(String),
}

/// Failures caused by the browser request or by the provider.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    /// The callback's `state` does not match the one stored in the session.
    StateMismatch,
    TokenExchange,
    ProfileFetch,
    ProfileDecode,
}

impl Error {
    pub(crate) fn internal(kind: InternalErrorKind) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(kind),
        }
    }

    pub(crate) fn external(kind: ExternalErrorKind) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::External(kind),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// This is where we translate errors from the `login_auth` layer to the `domain` layer.
impl From<LoginAuthError> for Error {
    fn from(err: LoginAuthError) -> Self {
        let error_kind = match &err.error_kind {
            LoginAuthErrorKind::OAuth(OAuthErrorKind::InvalidConfig) => {
                DomainErrorKind::Internal(InternalErrorKind::Config)
            }
            LoginAuthErrorKind::OAuth(OAuthErrorKind::TokenExchangeFailed) => {
                DomainErrorKind::External(ExternalErrorKind::TokenExchange)
            }
            LoginAuthErrorKind::OAuth(OAuthErrorKind::ProfileFetchFailed) => {
                DomainErrorKind::External(ExternalErrorKind::ProfileFetch)
            }
            LoginAuthErrorKind::OAuth(OAuthErrorKind::InvalidProfile) => {
                DomainErrorKind::External(ExternalErrorKind::ProfileDecode)
            }
            LoginAuthErrorKind::Session(SessionErrorKind::Write) => {
                DomainErrorKind::Internal(InternalErrorKind::SessionWrite)
            }
            // A state that cannot be read back cannot be proven to match.
            LoginAuthErrorKind::Session(SessionErrorKind::Read) => {
                DomainErrorKind::External(ExternalErrorKind::StateMismatch)
            }
            LoginAuthErrorKind::Http(_) => {
                DomainErrorKind::Internal(InternalErrorKind::Other(err.to_string()))
            }
        };
        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}
