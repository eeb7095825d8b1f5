//! Server pages under `/{lang}`.
//!
//! Rendering is left to the front end, so every page answers with a JSON
//! page model. Protected pages go through [`layout::DashboardLayout`], which
//! runs the role gate before anything is built.

mod auth;
mod dashboard;
mod home;
mod layout;

pub use auth::{AuthPage, FormKind};
pub use dashboard::{find_page, DashboardPage, DASHBOARD_PAGES};
pub use home::HomePage;
pub use layout::{DashboardLayout, PageModel};

use axum::http::Uri;
use axum::routing::{get, post};
use axum::Router;

use crate::app::AppState;
use crate::errors::{AppError, AppResult};
use crate::i18n::Locale;

/// Locale from the `{lang}` path segment. Only exact lowercase codes route.
pub(crate) fn path_locale(lang: &str) -> AppResult<Locale> {
    Locale::ALL
        .into_iter()
        .find(|locale| locale.as_str() == lang)
        .ok_or_else(|| AppError::not_found(format!("unsupported locale `{lang}`")))
}

/// Unrouted paths. Registered as a fallback so the locale gate also sees them.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::not_found(format!("no page at `{}`", uri.path()))
}

pub fn router() -> Router<AppState> {
    let mut router = Router::new()
        .route("/:lang", get(home::home))
        .route("/:lang/admin", get(dashboard::admin_index))
        .route("/:lang/profile", get(dashboard::profile_index))
        .route("/:lang/auth/login", get(auth::login_form).post(auth::login_submit))
        .route("/:lang/auth/sign-up", get(auth::sign_up_form).post(auth::sign_up_submit))
        .route("/:lang/auth/sign-up-success", get(auth::sign_up_success))
        .route(
            "/:lang/auth/forgot-password",
            get(auth::forgot_password_form).post(auth::forgot_password_submit),
        )
        .route(
            "/:lang/auth/update-password",
            get(auth::update_password_form).post(auth::update_password_submit),
        )
        .route("/:lang/auth/logout", post(auth::logout));

    for page in DASHBOARD_PAGES {
        router = router.route(&format!("/:lang{}", page.path), get(dashboard::dashboard_page));
    }

    router
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_exact_codes_route() {
        assert_eq!(path_locale("de").unwrap(), Locale::De);
        assert!(path_locale("DE").is_err());
        assert!(path_locale("fr").is_err());
    }
}
