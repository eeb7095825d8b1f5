use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app::AppState;
use crate::errors::AppResult;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub role_store_ok: bool,
    pub role_store_error: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses((status = 200, description = "Health check", body = HealthResponse))
)]
pub async fn health(State(state): State<AppState>) -> AppResult<Json<HealthResponse>> {
    match state.sessions.role_store().ping().await {
        Ok(()) => Ok(Json(HealthResponse { status: "ok", role_store_ok: true, role_store_error: None })),
        Err(e) => {
            tracing::warn!(error = %e, "role store unreachable");
            Ok(Json(HealthResponse { status: "degraded", role_store_ok: false, role_store_error: Some(e.to_string()) }))
        }
    }
}
