use axum::response::Redirect;
use serde::Serialize;

use crate::app::AppState;
use crate::auth::{require_role, Role, SessionTokens, SessionUser};
use crate::i18n::{Locale, Translator};
use crate::navigation::{breadcrumbs, profile_tabs, sidebar, Breadcrumb, NavLink, Sidebar, ViewMode};

use super::dashboard::DashboardPage;

/// Payload of a page inside the dashboard shell.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageModel {
    pub locale: Locale,
    pub path: String,
    pub title: &'static str,
    pub description: Option<&'static str>,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub sidebar: Sidebar,
    pub user: SessionUser,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tabs: Vec<NavLink>,
}

/// Shared shell of every protected page. Owns the view mode; pages receive it
/// from here rather than reading it themselves.
#[derive(Debug, Clone)]
pub struct DashboardLayout {
    pub locale: Locale,
    pub user: SessionUser,
    pub view: ViewMode,
    translator: Translator,
}

impl DashboardLayout {
    /// Gates the request on `required` and resolves the view mode.
    pub async fn enter(
        state: &AppState,
        tokens: &SessionTokens,
        locale: Locale,
        required: Role,
        requested_view: Option<&str>,
    ) -> Result<Self, Redirect> {
        let user = require_role(&state.sessions, tokens, required, locale).await?;
        let view = ViewMode::resolve(requested_view, user.role);

        Ok(Self {
            locale,
            view,
            translator: Translator::new(locale),
            user,
        })
    }

    pub fn render(&self, page: &DashboardPage) -> PageModel {
        let tr = &self.translator;
        let tabs = if page.path.starts_with("/profile/") {
            profile_tabs(self.user.role, tr)
        } else {
            Vec::new()
        };

        PageModel {
            locale: self.locale,
            path: self.locale.localize(page.path),
            title: tr.nav(page.title_key, page.literal),
            description: page
                .description_key
                .and_then(|key| tr.lookup("pageDescriptions", key)),
            breadcrumbs: breadcrumbs(page.path, self.locale, tr),
            sidebar: sidebar(self.user.role, self.view, tr),
            user: self.user.clone(),
            tabs,
        }
    }
}
