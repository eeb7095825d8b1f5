//! Client for the hosted identity provider.
//!
//! The portal never stores credentials. Every credential operation is a call
//! to a GoTrue-compatible REST API; access tokens are verified locally with
//! the provider's shared signing secret.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::jwt::JwtConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: i64,
    pub user: Identity,
}

#[derive(Debug, Clone)]
pub enum SignUpOutcome {
    /// The provider wants the address confirmed before the first sign-in.
    ConfirmationSent,
    SignedIn(AuthSession),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolves the identity behind an access token, `None` when the token is
    /// invalid or expired.
    async fn get_user(&self, access_token: &str) -> AppResult<Option<Identity>>;
    async fn refresh_session(&self, refresh_token: &str) -> AppResult<AuthSession>;
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthSession>;
    async fn sign_up(&self, email: &str, password: &str, redirect_to: &str) -> AppResult<SignUpOutcome>;
    async fn sign_out(&self, access_token: &str) -> AppResult<()>;
    async fn send_password_reset(&self, email: &str, redirect_to: &str) -> AppResult<()>;
    async fn update_password(&self, access_token: &str, password: &str) -> AppResult<()>;
}

#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub base_url: String,
    pub anon_key: String,
}

impl IdentityConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let base_url = std::env::var("IDENTITY_URL").map_err(|_| AppError::configuration("IDENTITY_URL not set"))?;
        let anon_key =
            std::env::var("IDENTITY_ANON_KEY").map_err(|_| AppError::configuration("IDENTITY_ANON_KEY not set"))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
        })
    }
}

pub struct HostedIdentityProvider {
    http: Client,
    config: IdentityConfig,
    jwt: Arc<JwtConfig>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(AuthSession),
    User(Identity),
}

impl HostedIdentityProvider {
    pub fn new(config: IdentityConfig, jwt: Arc<JwtConfig>) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;
        Ok(Self { http, config, jwt })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.config.base_url, path)
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("apikey", &self.config.anon_key)
    }

    /// Maps a non-success response to the provider's own message so it can
    /// be shown next to the form that caused it.
    async fn check(response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ProviderError>(&body)
            .ok()
            .and_then(|err| err.error_description.or(err.msg).or(err.message))
            .unwrap_or_else(|| format!("identity provider returned {status}"));

        tracing::warn!(status = %status, message = %message, "identity provider rejected request");
        Err(AppError::identity(message))
    }

    async fn token_grant(&self, grant_type: &str, body: serde_json::Value) -> AppResult<AuthSession> {
        let response = self
            .request(self.http.post(self.endpoint("/token")))
            .query(&[("grant_type", grant_type)])
            .json(&body)
            .send()
            .await?;

        Ok(Self::check(response).await?.json::<AuthSession>().await?)
    }
}

#[async_trait]
impl IdentityProvider for HostedIdentityProvider {
    async fn get_user(&self, access_token: &str) -> AppResult<Option<Identity>> {
        match self.jwt.decode(access_token) {
            Ok(claims) => Ok(Some(Identity {
                id: claims.sub,
                email: claims.email.unwrap_or_default(),
            })),
            Err(err) => {
                tracing::debug!(error = %err, "access token rejected");
                Ok(None)
            }
        }
    }

    async fn refresh_session(&self, refresh_token: &str) -> AppResult<AuthSession> {
        self.token_grant("refresh_token", json!({ "refresh_token": refresh_token }))
            .await
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        self.token_grant("password", json!({ "email": email, "password": password }))
            .await
    }

    async fn sign_up(&self, email: &str, password: &str, redirect_to: &str) -> AppResult<SignUpOutcome> {
        let response = self
            .request(self.http.post(self.endpoint("/signup")))
            .query(&[("redirect_to", redirect_to)])
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        match Self::check(response).await?.json::<SignUpResponse>().await? {
            SignUpResponse::Session(session) => Ok(SignUpOutcome::SignedIn(session)),
            SignUpResponse::User(user) => {
                tracing::info!(user_id = %user.id, "sign-up awaiting email confirmation");
                Ok(SignUpOutcome::ConfirmationSent)
            }
        }
    }

    async fn sign_out(&self, access_token: &str) -> AppResult<()> {
        let response = self
            .request(self.http.post(self.endpoint("/logout")))
            .bearer_auth(access_token)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn send_password_reset(&self, email: &str, redirect_to: &str) -> AppResult<()> {
        let response = self
            .request(self.http.post(self.endpoint("/recover")))
            .query(&[("redirect_to", redirect_to)])
            .json(&json!({ "email": email }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn update_password(&self, access_token: &str, password: &str) -> AppResult<()> {
        let response = self
            .request(self.http.put(self.endpoint("/user")))
            .bearer_auth(access_token)
            .json(&json!({ "password": password }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
