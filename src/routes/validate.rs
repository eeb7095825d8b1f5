use axum::body::Bytes;
use axum::extract::Path;
use axum::Json;

use crate::errors::AppResult;
use crate::models::EntityKind;

#[utoipa::path(
    post,
    path = "/api/validate/{entity}",
    tag = "Validation",
    params(("entity" = String, Path, description = "profile, event, application, school or user-role")),
    responses(
        (status = 200, description = "Normalized record"),
        (status = 400, description = "Payload rejected; the message names the failing field"),
        (status = 404, description = "Unknown entity")
    )
)]
pub async fn validate_entity(Path(entity): Path<String>, body: Bytes) -> AppResult<Json<serde_json::Value>> {
    let kind: EntityKind = entity.parse()?;
    let record = kind.validate(&body).map_err(|err| {
        tracing::debug!(entity = %kind, error = %err, "payload rejected");
        err
    })?;
    Ok(Json(record))
}
