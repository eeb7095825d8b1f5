//! Per-request locale routing and authentication gate.
//!
//! [`decide`] is the pure part: given the path, the negotiated locale and
//! whether a session exists it picks one terminal action. [`locale_gate`]
//! wires it into the router, runs the session check (refreshing expired
//! sessions) and makes sure refreshed or cleared cookies reach the browser
//! on every branch.

use axum::extract::{Request, State};
use axum::http::header::{ACCEPT_LANGUAGE, SET_COOKIE};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use crate::app::AppState;
use crate::auth::cookies::{append_set_cookies, clear_session_cookies, session_cookies};
use crate::auth::SessionTokens;
use crate::config::PortalConfig;
use crate::i18n::{negotiate_or, Locale};

const SKIPPED_PREFIXES: [&str; 4] = ["/api", "/_next", "/docs", "/api-docs"];
const AUTH_FLOW_PREFIXES: [&str; 2] = ["/auth", "/login"];

/// Terminal action for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Not handled by the gate at all (API, docs, static assets).
    Skip,
    PassThrough,
    /// Missing locale prefix; redirect to the localized path.
    Rewrite(String),
    /// Protected path without a session; redirect to the login page.
    AuthRedirect(String),
}

fn has_prefix_segment(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Paths the gate never touches.
pub fn is_skipped(path: &str) -> bool {
    if SKIPPED_PREFIXES.iter().any(|prefix| has_prefix_segment(path, prefix)) {
        return true;
    }
    path.rsplit('/').next().is_some_and(|last| last.contains('.'))
}

/// Login, sign-up and the other pages reachable without a session.
pub fn is_auth_flow(stripped_path: &str) -> bool {
    AUTH_FLOW_PREFIXES
        .iter()
        .any(|prefix| has_prefix_segment(stripped_path, prefix))
}

pub fn is_protected(stripped_path: &str, config: &PortalConfig) -> bool {
    stripped_path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .any(|segment| config.is_protected_segment(segment))
}

pub fn decide(
    path: &str,
    query: Option<&str>,
    negotiated: Locale,
    authenticated: bool,
    config: &PortalConfig,
) -> GateDecision {
    if is_skipped(path) {
        return GateDecision::Skip;
    }

    let prefixed = Locale::strip_prefix(path);
    let (locale, stripped) = match prefixed {
        Some((locale, rest)) => (locale, rest),
        None => (config.default_locale, path),
    };

    if !authenticated && is_protected(stripped, config) && !is_auth_flow(stripped) {
        return GateDecision::AuthRedirect(crate::auth::login_path(locale));
    }

    if prefixed.is_none() {
        let mut target = negotiated.localize(path);
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            target.push('?');
            target.push_str(query);
        }
        return GateDecision::Rewrite(target);
    }

    GateDecision::PassThrough
}

/// Router middleware applying [`decide`] to every request.
pub async fn locale_gate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    if is_skipped(&path) {
        return next.run(req).await;
    }

    let tokens = SessionTokens::from_headers(req.headers(), &state.config);
    let check = state.sessions.check(&tokens).await;

    let mut session_updates = Vec::new();
    if let Some(session) = &check.refreshed {
        session_updates = session_cookies(&state.config, session);
        req.extensions_mut().insert(SessionTokens::from_session(session));
    } else if check.cleared {
        session_updates = clear_session_cookies(&state.config);
        req.extensions_mut().insert(SessionTokens::default());
    }

    let accept_language = req
        .headers()
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok());
    let negotiated = negotiate_or(accept_language, state.config.default_locale);

    let decision = decide(
        &path,
        req.uri().query(),
        negotiated,
        check.is_authenticated(),
        &state.config,
    );

    let mut response = match decision {
        GateDecision::Skip | GateDecision::PassThrough => next.run(req).await,
        GateDecision::Rewrite(location) => {
            tracing::debug!(path = %path, locale = %negotiated, decision = "rewrite", "adding locale prefix");
            Redirect::temporary(&location).into_response()
        }
        GateDecision::AuthRedirect(location) => {
            tracing::info!(path = %path, decision = "auth-redirect", "unauthenticated request to protected path");
            Redirect::temporary(&location).into_response()
        }
    };

    // login and logout write the session cookies themselves; theirs win
    if !response.headers().contains_key(SET_COOKIE) {
        append_set_cookies(&mut response, &session_updates);
    }
    response
}
