mod common;

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::{DateTime, Utc};
use serde_json::json;
use tower::util::ServiceExt; // for `oneshot`
use yl_portal::auth::Role;

use common::{get, get_with_cookie, json_body, TestApp};

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn server_time_reports_matching_formats() -> Result<()> {
    let app = TestApp::new().await?;

    let resp = app.router.clone().oneshot(get("/api/server-time")).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let v = json_body(resp).await?;

    let timestamp = v["timestamp"].as_i64().expect("timestamp is a number");
    let iso = v["iso"].as_str().expect("iso is a string");
    assert!(iso.ends_with('Z'), "iso must be UTC: {iso}");
    let parsed: DateTime<Utc> = iso.parse()?;
    assert_eq!(parsed.timestamp_millis(), timestamp);

    Ok(())
}

#[tokio::test]
async fn health_reports_role_store() -> Result<()> {
    let app = TestApp::new().await?;

    let resp = app.router.clone().oneshot(get("/api/health")).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let v = json_body(resp).await?;
    assert_eq!(v["status"], "ok");
    assert_eq!(v["role_store_ok"], true, "got: {v}");

    app.pool.close().await;
    let resp = app.router.clone().oneshot(get("/api/health")).await?;
    let v = json_body(resp).await?;
    assert_eq!(v["status"], "degraded");
    assert_eq!(v["role_store_ok"], false);

    Ok(())
}

#[tokio::test]
async fn session_requires_a_token() -> Result<()> {
    let app = TestApp::new().await?;

    let resp = app.router.clone().oneshot(get("/api/session")).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = app
        .router
        .clone()
        .oneshot(get("/api/session/role-check?role=user"))
        .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn session_role_sources() -> Result<()> {
    let app = TestApp::new().await?;

    // stored role, no claim
    let (_, cookie) = app.login_as("stored@example.com", Some(Role::Teamer)).await?;
    let resp = app.router.clone().oneshot(get_with_cookie("/api/session", &cookie)).await?;
    let v = json_body(resp).await?;
    assert_eq!(v["role"], "teamer");
    assert_eq!(v["roleSource"], "store");

    // claim wins for display purposes
    let id = app.identity.register("claim@example.com", "pw");
    let token = app.identity.token(id, "claim@example.com", Some(Role::Admin));
    let resp = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/session")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())?,
        )
        .await?;
    let v = json_body(resp).await?;
    assert_eq!(v["role"], "admin");
    assert_eq!(v["roleSource"], "claim");
    assert_eq!(v["email"], "claim@example.com");

    // neither
    let (_, cookie) = app.login_as("plain@example.com", None).await?;
    let resp = app.router.clone().oneshot(get_with_cookie("/api/session", &cookie)).await?;
    let v = json_body(resp).await?;
    assert_eq!(v["role"], "user");
    assert_eq!(v["roleSource"], "default");

    Ok(())
}

#[tokio::test]
async fn role_check_uses_the_shared_policy() -> Result<()> {
    let app = TestApp::new().await?;
    let (_, cookie) = app.login_as("teamer@example.com", Some(Role::Teamer)).await?;

    for (required, allowed) in [("user", true), ("teamer", true), ("admin", false), ("superuser", false)] {
        let uri = format!("/api/session/role-check?role={required}");
        let resp = app.router.clone().oneshot(get_with_cookie(&uri, &cookie)).await?;
        assert_eq!(resp.status(), StatusCode::OK);
        let v = json_body(resp).await?;
        assert_eq!(v["allowed"], allowed, "required={required}: {v}");
        assert_eq!(v["required"], required);
    }

    Ok(())
}

#[tokio::test]
async fn validate_accepts_a_well_formed_event() -> Result<()> {
    let app = TestApp::new().await?;

    let event = json!({
        "nameDe": "Sommerakademie",
        "nameEn": "Summer Academy",
        "locationDe": "Berlin",
        "locationEn": "Berlin",
        "startsAt": "2026-07-01T09:00:00Z",
        "endsAt": "2026-07-05T17:00:00Z",
        "deadline": "2026-05-01T23:59:59Z",
        "statusInternal": "ACTIVE",
        "statusExternal": "INACTIVE",
        "teamApplicationRequired": "NOT_OPEN",
        "questions": {
            "motivation": { "id": "q1", "question": "Why?", "type": "text", "required": true }
        },
        "created_at": "2026-01-10T10:00:00Z"
    });
    let resp = app.router.clone().oneshot(post_json("/api/validate/event", event)).await?;
    let status = resp.status();
    let v = json_body(resp).await?;
    assert_eq!(status, StatusCode::OK, "body: {v}");
    assert_eq!(v["statusInternal"], "ACTIVE");
    assert_eq!(v["teamApplicationRequired"], "NOT_OPEN");
    assert_eq!(v["created_at"], "2026-01-10T10:00:00Z");

    Ok(())
}

#[tokio::test]
async fn validate_keeps_form_dates_and_custom_question_types() -> Result<()> {
    let app = TestApp::new().await?;

    let event = json!({
        "nameDe": "Herbstcamp",
        "nameEn": "Autumn Camp",
        "locationDe": "Hamburg",
        "locationEn": "Hamburg",
        "startsAt": "2026-10-01",
        "endsAt": "2026-10-04T12:00",
        "deadline": "2026-09-01",
        "statusInternal": "ACTIVE",
        "statusExternal": "ACTIVE",
        "teamApplicationRequired": "OPTIONAL",
        "questions": {
            "arrival": { "id": "q1", "question": "Arrival day?", "type": "date", "required": true }
        }
    });
    let resp = app.router.clone().oneshot(post_json("/api/validate/event", event)).await?;
    let status = resp.status();
    let v = json_body(resp).await?;
    assert_eq!(status, StatusCode::OK, "body: {v}");
    assert_eq!(v["startsAt"], "2026-10-01");
    assert_eq!(v["endsAt"], "2026-10-04T12:00");
    assert_eq!(v["questions"]["arrival"]["type"], "date");

    Ok(())
}

#[tokio::test]
async fn validate_reports_the_failing_field() -> Result<()> {
    let app = TestApp::new().await?;

    let role = json!({
        "id": "0b0b6bd4-7d3c-4a4a-a2d5-3b1f0e8f5b10",
        "user_id": "6a8f3c2e-1d4b-4c5a-9e7f-2b3c4d5e6f70",
        "role": "owner"
    });
    let resp = app
        .router
        .clone()
        .oneshot(post_json("/api/validate/user-role", role))
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let v = json_body(resp).await?;
    let message = v["message"].as_str().unwrap_or_default();
    assert!(message.contains("role"), "message should name the field: {message}");

    let event = json!({
        "nameDe": "A", "nameEn": "A", "locationDe": "B", "locationEn": "B",
        "startsAt": "2026-07-05T09:00:00Z",
        "endsAt": "2026-07-01T17:00:00Z",
        "deadline": "2026-05-01T00:00:00Z",
        "statusInternal": "ACTIVE",
        "statusExternal": "ACTIVE",
        "teamApplicationRequired": "REQUIRED"
    });
    let resp = app.router.clone().oneshot(post_json("/api/validate/event", event)).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let v = json_body(resp).await?;
    assert!(v["message"].as_str().unwrap_or_default().contains("endsAt"), "got: {v}");

    let resp = app
        .router
        .clone()
        .oneshot(post_json("/api/validate/spaceship", json!({})))
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    Ok(())
}
