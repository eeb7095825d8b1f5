use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Role;
use crate::errors::AppError;

/// Verification settings for access tokens issued by the identity provider.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: Arc<Vec<u8>>,
    pub exp_hours: i64,
    pub audience: Option<String>,
}

impl JwtConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let secret = std::env::var("JWT_SECRET").map_err(|_| AppError::configuration("JWT_SECRET not set"))?;
        let exp_hours = std::env::var("JWT_EXP_HOURS")
            .map(|val| val.parse::<i64>())
            .unwrap_or(Ok(1))
            .map_err(|_| AppError::configuration("JWT_EXP_HOURS must be a valid integer"))?;
        let audience = match std::env::var("JWT_AUDIENCE") {
            Ok(value) if value.trim().is_empty() => None,
            Ok(value) => Some(value),
            Err(_) => Some("authenticated".to_string()),
        };

        Ok(Self {
            secret: Arc::new(secret.into_bytes()),
            exp_hours,
            audience,
        })
    }

    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: Arc::new(secret.into()),
            exp_hours: 1,
            audience: Some("authenticated".to_string()),
        }
    }

    /// Signs a token in the provider's format. Used by local tooling and tests;
    /// production tokens are minted by the identity provider.
    pub fn encode(&self, user_id: Uuid, email: &str, user_role: Option<Role>) -> Result<String, AppError> {
        use chrono::{Duration, Utc};

        let now = Utc::now();
        let exp = now + Duration::hours(self.exp_hours);

        let claims = Claims {
            sub: user_id,
            email: Some(email.to_string()),
            aud: self.audience.clone(),
            user_role: user_role.map(|role| role.as_str().to_string()),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        jsonwebtoken::encode(&Header::default(), &claims, &EncodingKey::from_secret(&self.secret))
            .map_err(|err| AppError::token(err.to_string()))
    }

    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        match &self.audience {
            Some(aud) => validation.set_audience(&[aud.as_str()]),
            None => validation.validate_aud = false,
        }

        jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(&self.secret), &validation)
            .map(|data| data.claims)
            .map_err(|err| AppError::token(err.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_role: Option<String>,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Deserialize)]
struct RoleClaim {
    #[serde(default)]
    user_role: Option<String>,
}

/// Reads the `user_role` claim without checking the signature or expiry.
///
/// The result is only a hint for client-facing rendering. `Ok(None)` means the
/// token decoded but carries no recognised role.
pub fn decode_unverified_role(token: &str) -> Result<Option<Role>, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let claim = jsonwebtoken::decode::<RoleClaim>(token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(|err| AppError::token(err.to_string()))?
        .claims;

    Ok(claim.user_role.and_then(|role| role.parse::<Role>().ok()))
}
