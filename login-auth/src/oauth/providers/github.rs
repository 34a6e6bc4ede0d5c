//! GitHub OAuth provider implementation.

use async_trait::async_trait;
use log::*;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{oauth_error, Error, ErrorKind, OAuthErrorKind};
use crate::http::ClientBuilder;
use crate::oauth::{AccessToken, ProviderConfig, ProviderKind, UserProfile};

/// Scopes requested on login: profile access plus listed repositories.
pub const DEFAULT_SCOPES: [&str; 2] = ["user", "repo"];

/// Token endpoint answer. GitHub reports OAuth errors with a 200 status and
/// an `error` field, so every field is optional.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// Request to exchange authorization code for an access token
#[derive(Debug, Serialize)]
struct TokenExchangeRequest<'a> {
    code: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    redirect_uri: &'a str,
    grant_type: &'static str,
}

/// The subset of `GET /user` this login cares about.
#[derive(Debug, Deserialize)]
struct GitHubUser {
    #[serde(default, deserialize_with = "null_as_empty")]
    login: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    company: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    url: String,
}

impl From<GitHubUser> for UserProfile {
    fn from(user: GitHubUser) -> Self {
        UserProfile {
            login: user.login,
            name: user.name,
            email: user.email,
            affiliation: user.company,
            url: user.url,
        }
    }
}

// GitHub sends `null` for unset profile fields.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// GitHub OAuth provider.
///
/// Handles OAuth 2.0 flows for GitHub accounts, including:
/// - Authorization code exchange
/// - User profile retrieval from the GitHub REST API
pub struct Provider {
    config: ProviderConfig,
    http_client: reqwest::Client,
}

impl Provider {
    /// Create a new GitHub OAuth provider whose outbound calls are bounded
    /// by `config.timeout`.
    pub fn new(config: ProviderConfig) -> Result<Self, Error> {
        let http_client = ClientBuilder::new().with_timeout(config.timeout).build()?;
        Ok(Self {
            config,
            http_client,
        })
    }
}

#[async_trait]
impl crate::oauth::Provider for Provider {
    fn provider(&self) -> ProviderKind {
        ProviderKind::GitHub
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn exchange_code(&self, code: &str) -> Result<AccessToken, Error> {
        let request = TokenExchangeRequest {
            code,
            client_id: &self.config.client_id,
            client_secret: self.config.client_secret(),
            redirect_uri: &self.config.redirect_url,
            grant_type: "authorization_code",
        };

        debug!("Exchanging GitHub OAuth code for an access token");

        let response = self
            .http_client
            .post(self.config.endpoints.token_url.clone())
            .header(ACCEPT, "application/json")
            .form(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to exchange GitHub OAuth code: {:?}", e);
                Error::new(ErrorKind::OAuth(OAuthErrorKind::TokenExchangeFailed), e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            warn!("GitHub token endpoint returned {}: {}", status, error_text);
            return Err(oauth_error(
                OAuthErrorKind::TokenExchangeFailed,
                &format!("token endpoint returned {status}"),
            ));
        }

        let tokens: TokenResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse GitHub token response: {:?}", e);
            Error::new(ErrorKind::OAuth(OAuthErrorKind::TokenExchangeFailed), e)
        })?;

        if let Some(error) = tokens.error {
            let description = tokens.error_description.unwrap_or_default();
            warn!("GitHub OAuth error: {} {}", error, description);
            return Err(oauth_error(OAuthErrorKind::TokenExchangeFailed, &error));
        }

        let access_token = tokens.access_token.filter(|t| !t.is_empty()).ok_or_else(|| {
            warn!("GitHub token response carried no access_token");
            oauth_error(
                OAuthErrorKind::TokenExchangeFailed,
                "token response carried no access_token",
            )
        })?;

        info!("Successfully exchanged GitHub OAuth code for an access token");
        Ok(AccessToken::new(
            access_token,
            tokens.token_type.unwrap_or_else(|| "bearer".to_string()),
            tokens
                .scope
                .unwrap_or_default()
                .split(',')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        ))
    }

    async fn get_user_profile(&self, token: &AccessToken) -> Result<UserProfile, Error> {
        let response = self
            .http_client
            .get(self.config.endpoints.user_info_url.clone())
            .bearer_auth(token.secret())
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to get GitHub user profile: {:?}", e);
                Error::new(ErrorKind::OAuth(OAuthErrorKind::ProfileFetchFailed), e)
            })?;

        // The body is read to the end before the status is inspected so the
        // connection goes back to the pool on every path.
        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            warn!("Failed to read GitHub user profile body: {:?}", e);
            Error::new(ErrorKind::OAuth(OAuthErrorKind::ProfileFetchFailed), e)
        })?;

        if !status.is_success() {
            warn!(
                "GitHub user endpoint returned {}: {}",
                status,
                String::from_utf8_lossy(&body)
            );
            return Err(oauth_error(
                OAuthErrorKind::ProfileFetchFailed,
                &format!("user endpoint returned {status}"),
            ));
        }

        trace!("GitHub user profile: {}", String::from_utf8_lossy(&body));

        let user: GitHubUser = serde_json::from_slice(&body).map_err(|e| {
            warn!("Failed to parse GitHub user profile: {:?}", e);
            Error::new(ErrorKind::OAuth(OAuthErrorKind::InvalidProfile), e)
        })?;

        Ok(user.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oauth::{Endpoints, Provider as _};
    use mockito::{Matcher, Server, ServerGuard};
    use secrecy::SecretString;
    use std::io::Write;
    use std::time::Duration;

    fn create_provider(server: &ServerGuard) -> Provider {
        provider_for(&server.url())
    }

    fn provider_for(base: &str) -> Provider {
        provider_with_timeout(base, Duration::from_secs(5))
    }

    fn provider_with_timeout(base: &str, timeout: Duration) -> Provider {
        let config = ProviderConfig {
            client_id: "client-123".to_string(),
            client_secret: SecretString::new("secret-456".to_string()),
            redirect_url: "http://localhost:4000/callback/github".to_string(),
            scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
            endpoints: Endpoints::parse(
                &format!("{base}/login/oauth/authorize"),
                &format!("{base}/login/oauth/access_token"),
                &format!("{base}/user"),
            )
            .unwrap(),
            timeout,
        };
        Provider::new(config).unwrap()
    }

    fn test_token() -> AccessToken {
        AccessToken::new("gho_test".to_string(), "bearer".to_string(), vec![])
    }

    #[tokio::test]
    async fn test_exchange_code_success() {
        let mut server = Server::new_async().await;
        let provider = create_provider(&server);

        let mock = server
            .mock("POST", "/login/oauth/access_token")
            .match_header("accept", "application/json")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("code".into(), "the-code".into()),
                Matcher::UrlEncoded("client_id".into(), "client-123".into()),
                Matcher::UrlEncoded("client_secret".into(), "secret-456".into()),
                Matcher::UrlEncoded(
                    "redirect_uri".into(),
                    "http://localhost:4000/callback/github".into(),
                ),
                Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token":"gho_abc","token_type":"bearer","scope":"repo,user"}"#)
            .create_async()
            .await;

        let token = provider.exchange_code("the-code").await.unwrap();

        mock.assert_async().await;
        assert_eq!(token.secret(), "gho_abc");
        assert_eq!(token.token_type, "bearer");
        assert_eq!(token.scopes, vec!["repo".to_string(), "user".to_string()]);
    }

    #[tokio::test]
    async fn test_exchange_code_oauth_error_body() {
        let mut server = Server::new_async().await;
        let provider = create_provider(&server);

        let _mock = server
            .mock("POST", "/login/oauth/access_token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"error":"bad_verification_code","error_description":"The code passed is incorrect or expired."}"#,
            )
            .create_async()
            .await;

        let err = provider.exchange_code("stale").await.unwrap_err();
        assert_eq!(
            err.error_kind,
            ErrorKind::OAuth(OAuthErrorKind::TokenExchangeFailed)
        );
    }

    #[tokio::test]
    async fn test_exchange_code_http_error() {
        let mut server = Server::new_async().await;
        let provider = create_provider(&server);

        let _mock = server
            .mock("POST", "/login/oauth/access_token")
            .with_status(503)
            .with_body("unavailable")
            .create_async()
            .await;

        let err = provider.exchange_code("the-code").await.unwrap_err();
        assert_eq!(
            err.error_kind,
            ErrorKind::OAuth(OAuthErrorKind::TokenExchangeFailed)
        );
    }

    #[tokio::test]
    async fn test_exchange_code_missing_access_token() {
        let mut server = Server::new_async().await;
        let provider = create_provider(&server);

        let _mock = server
            .mock("POST", "/login/oauth/access_token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"token_type":"bearer"}"#)
            .create_async()
            .await;

        let err = provider.exchange_code("the-code").await.unwrap_err();
        assert_eq!(
            err.error_kind,
            ErrorKind::OAuth(OAuthErrorKind::TokenExchangeFailed)
        );
    }

    #[tokio::test]
    async fn test_get_user_profile_success() {
        let mut server = Server::new_async().await;
        let provider = create_provider(&server);

        let mock = server
            .mock("GET", "/user")
            .match_header("authorization", "Bearer gho_test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "login": "octocat",
                    "id": 1,
                    "name": "The Octocat",
                    "email": "octo@example.com",
                    "company": "@github",
                    "url": "https://api.github.com/users/octocat",
                    "public_repos": 8
                }"#,
            )
            .create_async()
            .await;

        let profile = provider.get_user_profile(&test_token()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            profile,
            UserProfile {
                login: "octocat".to_string(),
                name: "The Octocat".to_string(),
                email: "octo@example.com".to_string(),
                affiliation: "@github".to_string(),
                url: "https://api.github.com/users/octocat".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_get_user_profile_null_and_missing_fields_default_to_empty() {
        let mut server = Server::new_async().await;
        let provider = create_provider(&server);

        let _mock = server
            .mock("GET", "/user")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"login":"octocat","name":null,"email":null}"#)
            .create_async()
            .await;

        let profile = provider.get_user_profile(&test_token()).await.unwrap();
        assert_eq!(profile.login, "octocat");
        assert_eq!(profile.name, "");
        assert_eq!(profile.email, "");
        assert_eq!(profile.affiliation, "");
    }

    #[tokio::test]
    async fn test_get_user_profile_non_success_status() {
        let mut server = Server::new_async().await;
        let provider = create_provider(&server);

        let _mock = server
            .mock("GET", "/user")
            .with_status(401)
            .with_body(r#"{"message":"Bad credentials"}"#)
            .create_async()
            .await;

        let err = provider.get_user_profile(&test_token()).await.unwrap_err();
        assert_eq!(
            err.error_kind,
            ErrorKind::OAuth(OAuthErrorKind::ProfileFetchFailed)
        );
    }

    #[tokio::test]
    async fn test_get_user_profile_malformed_body() {
        let mut server = Server::new_async().await;
        let provider = create_provider(&server);

        let _mock = server
            .mock("GET", "/user")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let err = provider.get_user_profile(&test_token()).await.unwrap_err();
        assert_eq!(err.error_kind, ErrorKind::OAuth(OAuthErrorKind::InvalidProfile));
    }

    #[tokio::test]
    async fn test_get_user_profile_wrong_field_type() {
        let mut server = Server::new_async().await;
        let provider = create_provider(&server);

        let _mock = server
            .mock("GET", "/user")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"login":42}"#)
            .create_async()
            .await;

        let err = provider.get_user_profile(&test_token()).await.unwrap_err();
        assert_eq!(err.error_kind, ErrorKind::OAuth(OAuthErrorKind::InvalidProfile));
    }

    #[tokio::test]
    async fn test_unreachable_provider_fails_exchange() {
        // Nothing listens on port 1.
        let provider = provider_for("http://127.0.0.1:1");

        let err = provider.exchange_code("the-code").await.unwrap_err();
        assert_eq!(
            err.error_kind,
            ErrorKind::OAuth(OAuthErrorKind::TokenExchangeFailed)
        );
    }

    #[tokio::test]
    async fn test_unreachable_provider_fails_profile_fetch() {
        let provider = provider_for("http://127.0.0.1:1");

        let err = provider.get_user_profile(&test_token()).await.unwrap_err();
        assert_eq!(
            err.error_kind,
            ErrorKind::OAuth(OAuthErrorKind::ProfileFetchFailed)
        );
    }

    /// Mock whose body is held back well past a one second client timeout.
    async fn slow_mock(server: &mut ServerGuard, method: &str, path: &str) -> mockito::Mock {
        server
            .mock(method, path)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_chunked_body(|w| {
                std::thread::sleep(Duration::from_secs(3));
                w.write_all(br#"{"access_token":"late","login":"late"}"#)
            })
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_exchange_code_timeout() {
        let mut server = Server::new_async().await;
        let provider = provider_with_timeout(&server.url(), Duration::from_secs(1));
        let _mock = slow_mock(&mut server, "POST", "/login/oauth/access_token").await;

        let err = provider.exchange_code("the-code").await.unwrap_err();
        assert_eq!(
            err.error_kind,
            ErrorKind::OAuth(OAuthErrorKind::TokenExchangeFailed)
        );
    }

    #[tokio::test]
    async fn test_get_user_profile_timeout() {
        let mut server = Server::new_async().await;
        let provider = provider_with_timeout(&server.url(), Duration::from_secs(1));
        let _mock = slow_mock(&mut server, "GET", "/user").await;

        let err = provider.get_user_profile(&test_token()).await.unwrap_err();
        assert_eq!(
            err.error_kind,
            ErrorKind::OAuth(OAuthErrorKind::ProfileFetchFailed)
        );
    }
}
