use axum::Json;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ServerTime {
    /// Milliseconds since the Unix epoch.
    #[schema(example = 1767225600000_i64)]
    pub timestamp: i64,
    #[schema(example = "2026-01-01T00:00:00.000Z")]
    pub iso: String,
}

impl ServerTime {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            timestamp: now.timestamp_millis(),
            iso: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/server-time",
    tag = "Time",
    responses((status = 200, description = "Current server time", body = ServerTime))
)]
pub async fn server_time() -> Json<ServerTime> {
    Json(ServerTime::at(Utc::now()))
}
