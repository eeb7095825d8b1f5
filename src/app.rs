use std::sync::Arc;

use axum::http::Method;
use axum::middleware;
use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{HostedIdentityProvider, IdentityConfig, IdentityProvider, RoleStore, SessionAccessor, SqlRoleStore};
use crate::config::PortalConfig;
use crate::docs;
use crate::errors::AppError;
use crate::jwt::JwtConfig;
use crate::middleware::locale_gate;
use crate::{pages, routes};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<PortalConfig>,
    pub sessions: SessionAccessor,
}

impl AppState {
    pub fn new(config: PortalConfig, identity: Arc<dyn IdentityProvider>, roles: Arc<dyn RoleStore>) -> Self {
        Self {
            config: Arc::new(config),
            sessions: SessionAccessor::new(identity, roles),
        }
    }
}

/// Builds the application from the environment: hosted identity provider,
/// role table in `pool`.
pub async fn create_app(pool: SqlitePool) -> Result<Router, AppError> {
    let config = PortalConfig::from_env()?;
    let jwt = Arc::new(JwtConfig::from_env()?);
    let identity = HostedIdentityProvider::new(IdentityConfig::from_env()?, jwt)?;

    let state = AppState::new(config, Arc::new(identity), Arc::new(SqlRoleStore::new(pool)));
    create_app_with_state(state)
}

pub fn create_app_with_state(state: AppState) -> Result<Router, AppError> {
    let openapi = docs::build_openapi(&state.config.public_origin, &state.config.access_cookie)?;

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_origin(Any)
        .allow_headers(Any);

    let router = Router::new()
        .nest("/api", routes::api_router())
        .merge(pages::router())
        .fallback(pages::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), locale_gate))
        .with_state(state)
        .merge(docs::swagger_routes(openapi))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(router)
}
