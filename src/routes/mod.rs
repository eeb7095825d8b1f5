pub mod health;
pub mod server_time;
pub mod session;
pub mod validate;

use axum::routing::{get, post};
use axum::Router;

use crate::app::AppState;

/// JSON endpoints under `/api`. None of them go through the locale gate.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/server-time", get(server_time::server_time))
        .route("/session", get(session::current_session))
        .route("/session/role-check", get(session::role_check))
        .route("/validate/:entity", post(validate::validate_entity))
}
