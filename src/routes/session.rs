use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::{satisfies_named, Role, RoleSource, SessionTokens};
use crate::errors::{AppError, AppResult};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub role_source: RoleSource,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RoleCheckQuery {
    /// Minimum role to test, e.g. `teamer`.
    pub role: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoleCheckResponse {
    pub role: Role,
    pub required: String,
    pub allowed: bool,
}

async fn client_session(state: &AppState, tokens: &SessionTokens) -> AppResult<SessionResponse> {
    let (user, role_source) = state
        .sessions
        .client_session(tokens.access_token.as_deref())
        .await
        .ok_or_else(|| AppError::unauthorized("no active session"))?;

    Ok(SessionResponse {
        id: user.id,
        email: user.email,
        role: user.role,
        role_source,
    })
}

/// Session as seen by client-side rendering. The role may come from the
/// unverified token claim and must not be used for access decisions.
#[utoipa::path(
    get,
    path = "/api/session",
    tag = "Session",
    responses(
        (status = 200, description = "Current session", body = SessionResponse),
        (status = 401, description = "No active session")
    )
)]
pub async fn current_session(
    State(state): State<AppState>,
    tokens: SessionTokens,
) -> AppResult<Json<SessionResponse>> {
    client_session(&state, &tokens).await.map(Json)
}

#[utoipa::path(
    get,
    path = "/api/session/role-check",
    tag = "Session",
    params(RoleCheckQuery),
    responses(
        (status = 200, description = "Whether the session meets the role", body = RoleCheckResponse),
        (status = 401, description = "No active session")
    )
)]
pub async fn role_check(
    State(state): State<AppState>,
    Query(query): Query<RoleCheckQuery>,
    tokens: SessionTokens,
) -> AppResult<Json<RoleCheckResponse>> {
    let session = client_session(&state, &tokens).await?;
    let allowed = satisfies_named(Some(session.role), &query.role);

    Ok(Json(RoleCheckResponse {
        role: session.role,
        required: query.role,
        allowed,
    }))
}
