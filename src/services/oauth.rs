//! GitHub OAuth collaborator.
//!
//! The login handler only sees the [`OAuthProvider`] trait; the production
//! implementation talks to GitHub's token and user endpoints over HTTPS.
//! Tests substitute a stub.

use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

use crate::config::GithubConfig;
use crate::models::OAuthUserInfo;

const GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const GITHUB_USER_URL: &str = "https://api.github.com/user";

// GitHub rejects API requests without a User-Agent.
const USER_AGENT: &str = concat!("mentorship-portal-server/", env!("CARGO_PKG_VERSION"));

/// Failure while talking to the OAuth provider. Carries the underlying cause
/// for logging; never surfaced to the client directly.
#[derive(Debug)]
pub struct OAuthProviderError {
    message: String,
}

impl OAuthProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for OAuthProviderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for OAuthProviderError {}

impl From<reqwest::Error> for OAuthProviderError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// The OAuth provider's two endpoints, as consumed by the login flow.
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// Exchange an authorization code for an access token.
    async fn exchange_code(&self, code: &str) -> Result<String, OAuthProviderError>;

    /// Resolve an access token to the authenticated user's identity.
    async fn fetch_user(&self, access_token: &str) -> Result<OAuthUserInfo, OAuthProviderError>;
}

pub type DynOAuthProvider = Arc<dyn OAuthProvider>;

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GithubUser {
    login: String,
    name: Option<String>,
    email: Option<String>,
}

impl From<GithubUser> for OAuthUserInfo {
    fn from(user: GithubUser) -> Self {
        // name/email are nullable on the GitHub side; the wire contract uses
        // empty strings.
        Self {
            username: user.login,
            name: user.name.unwrap_or_default(),
            email: user.email.unwrap_or_default(),
        }
    }
}

/// Production [`OAuthProvider`] backed by GitHub.
pub struct GithubOAuth {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
}

impl GithubOAuth {
    pub fn new(config: &GithubConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        }
    }
}

#[async_trait]
impl OAuthProvider for GithubOAuth {
    async fn exchange_code(&self, code: &str) -> Result<String, OAuthProviderError> {
        let response = self
            .http
            .post(GITHUB_TOKEN_URL)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
            ])
            .send()
            .await?
            .error_for_status()?;

        // GitHub reports exchange failures (expired/used codes, bad client
        // credentials) as a 200 with an error payload.
        let token: AccessTokenResponse = response.json().await?;
        match token.access_token {
            Some(access_token) if !access_token.is_empty() => Ok(access_token),
            _ => Err(OAuthProviderError::new(token.error_description.unwrap_or_else(
                || "provider response carried no access token".to_string(),
            ))),
        }
    }

    async fn fetch_user(&self, access_token: &str) -> Result<OAuthUserInfo, OAuthProviderError> {
        let user: GithubUser = self
            .http
            .get(GITHUB_USER_URL)
            .bearer_auth(access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(user.into())
    }
}
