use axum::extract::{MatchedPath, Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::Deserialize;

use crate::app::AppState;
use crate::auth::{dashboard_path, require_role, Role, SessionTokens};
use crate::errors::{AppError, AppResult};

use super::layout::DashboardLayout;
use super::path_locale;

/// A content page of the dashboard shell.
#[derive(Debug)]
pub struct DashboardPage {
    /// App-relative path, without the locale prefix.
    pub path: &'static str,
    /// `navigation` key of the page title.
    pub title_key: &'static str,
    pub literal: &'static str,
    /// `pageDescriptions` key.
    pub description_key: Option<&'static str>,
    pub required: Role,
}

const fn page(
    path: &'static str,
    title_key: &'static str,
    literal: &'static str,
    description_key: &'static str,
    required: Role,
) -> DashboardPage {
    DashboardPage {
        path,
        title_key,
        literal,
        description_key: Some(description_key),
        required,
    }
}

pub static DASHBOARD_PAGES: &[DashboardPage] = &[
    page("/dashboard", "dashboard", "Dashboard", "dashboard", Role::User),
    page("/events", "events", "Events", "events", Role::User),
    page("/events/current-events", "currentEvents", "Current Events", "currentEvents", Role::User),
    page("/events/past-events", "pastEvents", "Past Events", "pastEvents", Role::User),
    page("/events/upcoming", "upcoming", "Upcoming", "upcomingEvents", Role::User),
    page("/applications", "applications", "Applications", "applications", Role::User),
    page(
        "/applications/current-applications",
        "currentApplications",
        "Current Applications",
        "currentApplications",
        Role::User,
    ),
    page("/applications/current", "currentApplications", "Current Applications", "currentApplications", Role::User),
    page(
        "/applications/past-applications",
        "pastApplications",
        "Past Applications",
        "pastApplications",
        Role::User,
    ),
    page("/profile/personal", "personalInfo", "Personal Information", "personalInfo", Role::User),
    page("/profile/contact", "contactDetails", "Contact Details", "contactDetails", Role::User),
    page("/profile/address", "address", "Address", "address", Role::User),
    page("/profile/education", "education", "Education", "education", Role::User),
    page("/profile/preferences", "preferences", "Preferences", "preferences", Role::User),
    page("/profile/teamer", "teamerInfo", "Teamer Information", "teamerInfo", Role::Teamer),
    page("/settings", "settings", "Settings", "settings", Role::User),
    page("/settings/appearance", "appearance", "Appearance", "appearance", Role::User),
    page("/settings/language", "language", "Language", "language", Role::User),
    page("/admin/events", "adminEvents", "Event Administration", "adminEvents", Role::Admin),
    page("/admin/events/manage-events", "manageEvents", "Manage Events", "manageEvents", Role::Admin),
    page("/admin/events/manage", "manageEvents", "Manage Events", "manageEvents", Role::Admin),
    page("/admin/events/create-event", "createEvent", "Create Event", "createEvent", Role::Admin),
    page("/admin/events/analytics", "eventAnalytics", "Event Analytics", "eventAnalytics", Role::Admin),
    page(
        "/admin/applications",
        "adminApplications",
        "Application Administration",
        "adminApplications",
        Role::Admin,
    ),
    page(
        "/admin/applications/manage-applications",
        "manageApplications",
        "Manage Applications",
        "manageApplications",
        Role::Admin,
    ),
    page(
        "/admin/applications/compare",
        "compareApplications",
        "Compare Applications",
        "compareApplications",
        Role::Admin,
    ),
    page("/admin/schools", "adminSchools", "School Administration", "adminSchools", Role::Admin),
    page("/admin/schools/manage", "manageSchools", "Manage Schools", "manageSchools", Role::Admin),
];

pub fn find_page(path: &str) -> Option<&'static DashboardPage> {
    DASHBOARD_PAGES.iter().find(|page| page.path == path)
}

#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    pub view: Option<String>,
}

pub async fn dashboard_page(
    State(state): State<AppState>,
    matched: MatchedPath,
    Path(lang): Path<String>,
    Query(query): Query<ViewQuery>,
    tokens: SessionTokens,
) -> AppResult<Response> {
    let locale = path_locale(&lang)?;
    let route = matched.as_str().strip_prefix("/:lang").unwrap_or_default();
    let page = find_page(route).ok_or_else(|| AppError::not_found(format!("no page at `{route}`")))?;

    let layout =
        match DashboardLayout::enter(&state, &tokens, locale, page.required, query.view.as_deref()).await {
            Ok(layout) => layout,
            Err(redirect) => return Ok(redirect.into_response()),
        };

    Ok(Json(layout.render(page)).into_response())
}

/// `/{lang}/admin` has no content of its own.
pub async fn admin_index(
    State(state): State<AppState>,
    Path(lang): Path<String>,
    tokens: SessionTokens,
) -> AppResult<Response> {
    let locale = path_locale(&lang)?;
    if let Err(redirect) = require_role(&state.sessions, &tokens, Role::Admin, locale).await {
        return Ok(redirect.into_response());
    }
    Ok(Redirect::temporary(&dashboard_path(locale)).into_response())
}

pub async fn profile_index(
    State(state): State<AppState>,
    Path(lang): Path<String>,
    tokens: SessionTokens,
) -> AppResult<Response> {
    let locale = path_locale(&lang)?;
    if let Err(redirect) = require_role(&state.sessions, &tokens, Role::User, locale).await {
        return Ok(redirect.into_response());
    }
    Ok(Redirect::temporary(&locale.localize("/profile/personal")).into_response())
}
