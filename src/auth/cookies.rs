use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::Response;

use super::identity::AuthSession;
use crate::app::AppState;
use crate::config::PortalConfig;

const REFRESH_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 30;

/// Tokens carried by the current request.
///
/// The middleware stores a refreshed pair as a request extension so the page
/// rendering the same request sees the new tokens instead of the stale cookie.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionTokens {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl SessionTokens {
    pub fn from_headers(headers: &HeaderMap, config: &PortalConfig) -> Self {
        let bearer = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(String::from);

        Self {
            access_token: read_cookie(headers, &config.access_cookie).or(bearer),
            refresh_token: read_cookie(headers, &config.refresh_cookie),
        }
    }

    pub fn from_session(session: &AuthSession) -> Self {
        Self {
            access_token: Some(session.access_token.clone()),
            refresh_token: Some(session.refresh_token.clone()),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for SessionTokens {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(tokens) = parts.extensions.get::<SessionTokens>() {
            return Ok(tokens.clone());
        }
        Ok(SessionTokens::from_headers(&parts.headers, &state.config))
    }
}

/// Value of cookie `name` across all `Cookie` headers.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

fn build_cookie(config: &PortalConfig, name: &str, value: &str, max_age: i64) -> Option<HeaderValue> {
    let mut cookie = format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}");
    if config.cookie_secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).ok()
}

/// `Set-Cookie` values persisting a freshly issued session.
pub fn session_cookies(config: &PortalConfig, session: &AuthSession) -> Vec<HeaderValue> {
    let access_max_age = if session.expires_in > 0 { session.expires_in } else { 3600 };
    [
        build_cookie(config, &config.access_cookie, &session.access_token, access_max_age),
        build_cookie(config, &config.refresh_cookie, &session.refresh_token, REFRESH_MAX_AGE_SECS),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// `Set-Cookie` values removing the session.
pub fn clear_session_cookies(config: &PortalConfig) -> Vec<HeaderValue> {
    [
        build_cookie(config, &config.access_cookie, "", 0),
        build_cookie(config, &config.refresh_cookie, "", 0),
    ]
    .into_iter()
    .flatten()
    .collect()
}

pub fn append_set_cookies(response: &mut Response, cookies: &[HeaderValue]) {
    let headers = response.headers_mut();
    for cookie in cookies {
        headers.append(SET_COOKIE, cookie.clone());
    }
}
