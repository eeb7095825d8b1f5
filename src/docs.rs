use serde_json::{json, Map, Value};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{Role, RoleSource};
use crate::i18n::Locale;
use crate::models;
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health::health,
        routes::server_time::server_time,
        routes::session::current_session,
        routes::session::role_check,
        routes::validate::validate_entity
    ),
    components(
        schemas(
            routes::health::HealthResponse,
            routes::server_time::ServerTime,
            routes::session::SessionResponse,
            routes::session::RoleCheckResponse,
            Role,
            RoleSource,
            Locale,
            models::Profile,
            models::profile::Engagement,
            models::Event,
            models::event::Question,
            models::event::TeamPreferenceOption,
            models::Application,
            models::application::Skill,
            models::application::TeamPreference,
            models::School,
            models::UserRoleRecord,
            models::enums::Title,
            models::enums::Grade,
            models::enums::FederalState,
            models::enums::Allergen,
            models::enums::BahnCard,
            models::enums::EventStatus,
            models::enums::TeamApplicationStatus,
            models::enums::ApplicationStatus
        )
    ),
    tags(
        (name = "Health", description = "Service status"),
        (name = "Time", description = "Server clock"),
        (name = "Session", description = "Client-side session probe"),
        (name = "Validation", description = "Record payload validation")
    )
)]
pub struct ApiDoc;

/// OpenAPI document with the session cookie scheme and the public origin
/// as server entry.
pub fn build_openapi(public_origin: &str, session_cookie: &str) -> anyhow::Result<utoipa::openapi::OpenApi> {
    let mut doc = serde_json::to_value(ApiDoc::openapi())?;

    ensure_security_components(&mut doc, session_cookie);
    ensure_servers(&mut doc, public_origin);

    Ok(serde_json::from_value(doc)?)
}

pub fn swagger_routes(doc: utoipa::openapi::OpenApi) -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", doc)
}

fn object_entry<'a>(value: &'a mut Value, key: &str) -> Option<&'a mut Map<String, Value>> {
    value
        .as_object_mut()?
        .entry(key)
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
}

fn ensure_security_components(doc: &mut Value, session_cookie: &str) {
    let Some(schemes) = object_entry(doc, "components").and_then(|components| {
        components
            .entry("securitySchemes")
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()
    }) else {
        return;
    };

    schemes.insert(
        "sessionCookie".to_string(),
        json!({ "type": "apiKey", "in": "cookie", "name": session_cookie }),
    );
    schemes.insert(
        "bearerAuth".to_string(),
        json!({ "type": "http", "scheme": "bearer", "bearerFormat": "JWT" }),
    );
}

fn ensure_servers(doc: &mut Value, public_origin: &str) {
    match doc.get_mut("servers") {
        Some(Value::Array(servers)) => {
            let has = servers
                .iter()
                .any(|server| server.get("url").and_then(Value::as_str) == Some(public_origin));
            if !has {
                servers.push(json!({ "url": public_origin }));
            }
        }
        _ => doc["servers"] = json!([{ "url": public_origin }]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_api_paths_and_cookie_scheme() {
        let doc = build_openapi("http://localhost:8000", "yl-access-token").unwrap();
        let value = serde_json::to_value(&doc).unwrap();

        assert!(value["paths"]["/api/server-time"]["get"].is_object());
        assert!(value["paths"]["/api/validate/{entity}"]["post"].is_object());
        assert_eq!(
            value["components"]["securitySchemes"]["sessionCookie"]["name"],
            "yl-access-token"
        );
        assert_eq!(value["servers"][0]["url"], "http://localhost:8000");
    }
}
