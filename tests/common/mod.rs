#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use axum::body::{self, Body};
use axum::http::{header, Request, Response};
use axum::Router;
use serde_json::Value;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;
use tempfile::TempDir;
use uuid::Uuid;

use yl_portal::auth::{AuthSession, Identity, IdentityProvider, Role, SignUpOutcome, SqlRoleStore};
use yl_portal::config::PortalConfig;
use yl_portal::errors::{AppError, AppResult};
use yl_portal::jwt::JwtConfig;
use yl_portal::{create_app_with_state, AppState};

pub const SECRET: &str = "integration-secret";

struct Account {
    id: Uuid,
    password: String,
}

/// In-memory identity provider minting real HS256 tokens.
#[derive(Default)]
pub struct FakeIdentity {
    jwt: Option<JwtConfig>,
    accounts: Mutex<HashMap<String, Account>>,
    refresh_tokens: Mutex<HashMap<String, (Uuid, String)>>,
    pub reset_requests: Mutex<Vec<(String, String)>>,
    pub sign_up_redirects: Mutex<Vec<String>>,
    pub signed_out: Mutex<Vec<String>>,
}

impl FakeIdentity {
    pub fn new() -> Self {
        Self {
            jwt: Some(JwtConfig::new(SECRET)),
            ..Self::default()
        }
    }

    fn jwt(&self) -> &JwtConfig {
        self.jwt.as_ref().expect("fake identity built without jwt")
    }

    pub fn register(&self, email: &str, password: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.accounts.lock().unwrap().insert(
            email.to_string(),
            Account {
                id,
                password: password.to_string(),
            },
        );
        id
    }

    /// A valid access token, optionally carrying a `user_role` claim.
    pub fn token(&self, id: Uuid, email: &str, claim: Option<Role>) -> String {
        self.jwt().encode(id, email, claim).unwrap()
    }

    pub fn issue_refresh_token(&self, id: Uuid, email: &str) -> String {
        let token = format!("refresh-{}", Uuid::new_v4());
        self.refresh_tokens
            .lock()
            .unwrap()
            .insert(token.clone(), (id, email.to_string()));
        token
    }

    fn session(&self, id: Uuid, email: &str) -> AuthSession {
        AuthSession {
            access_token: self.token(id, email, None),
            refresh_token: self.issue_refresh_token(id, email),
            expires_in: 3600,
            user: Identity {
                id,
                email: email.to_string(),
            },
        }
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn get_user(&self, access_token: &str) -> AppResult<Option<Identity>> {
        Ok(self.jwt().decode(access_token).ok().map(|claims| Identity {
            id: claims.sub,
            email: claims.email.unwrap_or_default(),
        }))
    }

    async fn refresh_session(&self, refresh_token: &str) -> AppResult<AuthSession> {
        let entry = self.refresh_tokens.lock().unwrap().remove(refresh_token);
        match entry {
            Some((id, email)) => Ok(self.session(id, &email)),
            None => Err(AppError::identity("Invalid Refresh Token: Refresh Token Not Found")),
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let id = {
            let accounts = self.accounts.lock().unwrap();
            match accounts.get(email) {
                Some(account) if account.password == password => account.id,
                _ => return Err(AppError::identity("Invalid login credentials")),
            }
        };
        Ok(self.session(id, email))
    }

    async fn sign_up(&self, email: &str, password: &str, redirect_to: &str) -> AppResult<SignUpOutcome> {
        if self.accounts.lock().unwrap().contains_key(email) {
            return Err(AppError::identity("User already registered"));
        }
        self.register(email, password);
        self.sign_up_redirects.lock().unwrap().push(redirect_to.to_string());
        Ok(SignUpOutcome::ConfirmationSent)
    }

    async fn sign_out(&self, access_token: &str) -> AppResult<()> {
        self.signed_out.lock().unwrap().push(access_token.to_string());
        Ok(())
    }

    async fn send_password_reset(&self, email: &str, redirect_to: &str) -> AppResult<()> {
        self.reset_requests
            .lock()
            .unwrap()
            .push((email.to_string(), redirect_to.to_string()));
        Ok(())
    }

    async fn update_password(&self, access_token: &str, password: &str) -> AppResult<()> {
        let Some(identity) = self.get_user(access_token).await? else {
            return Err(AppError::identity("Auth session missing!"));
        };
        let mut accounts = self.accounts.lock().unwrap();
        match accounts.get_mut(&identity.email) {
            Some(account) => {
                account.password = password.to_string();
                Ok(())
            }
            None => Err(AppError::identity("User not found")),
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub identity: Arc<FakeIdentity>,
    pub config: PortalConfig,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Result<Self> {
        Self::with_config(PortalConfig::default()).await
    }

    pub async fn with_config(config: PortalConfig) -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let opts = SqliteConnectOptions::new()
            .filename(dir.path().join("roles.db"))
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(opts).await?;

        let migrator =
            sqlx::migrate::Migrator::new(std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations"))
                .await?;
        migrator.run(&pool).await?;

        let identity = Arc::new(FakeIdentity::new());
        let state = AppState::new(
            config.clone(),
            identity.clone(),
            Arc::new(SqlRoleStore::new(pool.clone())),
        );
        let router = create_app_with_state(state)?;

        Ok(Self {
            router,
            pool,
            identity,
            config,
            _dir: dir,
        })
    }

    pub async fn grant(&self, user_id: Uuid, role: Role) -> Result<()> {
        sqlx::query("INSERT INTO user_roles (id, user_id, role) VALUES (?, ?, ?)")
            .bind(Uuid::new_v4().to_string())
            .bind(user_id.to_string())
            .bind(role.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Registers a user, stores `role` (unless `None`) and returns a cookie
    /// header carrying a fresh access token.
    pub async fn login_as(&self, email: &str, role: Option<Role>) -> Result<(Uuid, String)> {
        let id = self.identity.register(email, "secret-password");
        if let Some(role) = role {
            self.grant(id, role).await?;
        }
        let token = self.identity.token(id, email, None);
        Ok((id, format!("{}={}", self.config.access_cookie, token)))
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

pub fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

pub fn post_form(uri: &str, form: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(form.to_string())).unwrap()
}

pub fn location(resp: &Response<Body>) -> Option<&str> {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

pub fn set_cookies(resp: &Response<Body>) -> Vec<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok().map(String::from))
        .collect()
}

pub async fn json_body(resp: Response<Body>) -> Result<Value> {
    let bytes = body::to_bytes(resp.into_body(), 10_485_760).await?;
    Ok(serde_json::from_slice(&bytes)?)
}
