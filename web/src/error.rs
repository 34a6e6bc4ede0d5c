use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use domain::error::{DomainErrorKind, Error as DomainError, ExternalErrorKind, InternalErrorKind};

extern crate log;
use log::*;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(DomainError);

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

// Failed logins answer with a bare status; the browser is never redirected
// to the landing page with partial claims.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self.0.error_kind {
            DomainErrorKind::Internal(internal_error_kind) => match internal_error_kind {
                InternalErrorKind::Config
                | InternalErrorKind::SessionWrite
                | InternalErrorKind::RedirectBuild
                | InternalErrorKind::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            DomainErrorKind::External(external_error_kind) => match external_error_kind {
                ExternalErrorKind::StateMismatch | ExternalErrorKind::TokenExchange => {
                    StatusCode::UNAUTHORIZED
                }
                ExternalErrorKind::ProfileFetch => StatusCode::BAD_REQUEST,
                ExternalErrorKind::ProfileDecode => StatusCode::INTERNAL_SERVER_ERROR,
            },
        };

        debug!("Responding to failed login with {status}");
        let reason = status.canonical_reason().unwrap_or_default().to_uppercase();
        (status, reason).into_response()
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_for(error_kind: DomainErrorKind) -> StatusCode {
        Error(DomainError {
            source: None,
            error_kind,
        })
        .into_response()
        .status()
    }

    #[test]
    fn test_authentication_failures_are_unauthorized() {
        assert_eq!(
            status_for(DomainErrorKind::External(ExternalErrorKind::StateMismatch)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(DomainErrorKind::External(ExternalErrorKind::TokenExchange)),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_profile_fetch_failure_is_bad_request() {
        assert_eq!(
            status_for(DomainErrorKind::External(ExternalErrorKind::ProfileFetch)),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_internal_and_decode_failures_are_server_errors() {
        for kind in [
            DomainErrorKind::External(ExternalErrorKind::ProfileDecode),
            DomainErrorKind::Internal(InternalErrorKind::SessionWrite),
            DomainErrorKind::Internal(InternalErrorKind::RedirectBuild),
            DomainErrorKind::Internal(InternalErrorKind::Config),
        ] {
            assert_eq!(status_for(kind), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_error_response_has_no_location() {
        let response = Error(DomainError {
            source: None,
            error_kind: DomainErrorKind::External(ExternalErrorKind::StateMismatch),
        })
        .into_response();
        assert!(response.headers().get("location").is_none());
    }
}
