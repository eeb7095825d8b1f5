use axum::response::Redirect;

use super::cookies::SessionTokens;
use super::policy::satisfies;
use super::session::{SessionAccessor, SessionUser};
use super::Role;
use crate::i18n::Locale;

pub fn login_path(locale: Locale) -> String {
    locale.localize("/auth/login")
}

pub fn dashboard_path(locale: Locale) -> String {
    locale.localize("/dashboard")
}

/// Server-side page gate.
///
/// No session redirects to the localized login page; a session whose role
/// does not satisfy `required` redirects to the localized dashboard. Pages
/// are only protected if they (or their layout) call this.
pub async fn require_role(
    accessor: &SessionAccessor,
    tokens: &SessionTokens,
    required: Role,
    locale: Locale,
) -> Result<SessionUser, Redirect> {
    let Some(session) = accessor.server_session(tokens.access_token.as_deref()).await else {
        tracing::debug!(required = %required, "no session, redirecting to login");
        return Err(Redirect::temporary(&login_path(locale)));
    };

    if !satisfies(session.role, required) {
        tracing::info!(
            user_id = %session.id,
            role = %session.role,
            required = %required,
            "insufficient role, redirecting to dashboard"
        );
        return Err(Redirect::temporary(&dashboard_path(locale)));
    }

    Ok(session)
}
