use crate::errors::AppError;
use crate::i18n::{Locale, DEFAULT_LOCALE};

/// Request-routing and cookie settings shared by the middleware and pages.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub default_locale: Locale,
    /// Path segments that mark the authenticated area.
    pub protected_markers: Vec<String>,
    pub access_cookie: String,
    pub refresh_cookie: String,
    pub cookie_secure: bool,
    /// Absolute origin used in links the identity provider emails out.
    pub public_origin: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            default_locale: DEFAULT_LOCALE,
            protected_markers: vec!["dashboard".to_string()],
            access_cookie: "yl-access-token".to_string(),
            refresh_cookie: "yl-refresh-token".to_string(),
            cookie_secure: false,
            public_origin: "http://localhost:8000".to_string(),
        }
    }
}

impl PortalConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        let default_locale = match std::env::var("DEFAULT_LOCALE") {
            Ok(code) => code
                .parse::<Locale>()
                .map_err(|_| AppError::configuration(format!("DEFAULT_LOCALE `{code}` is not a supported locale")))?,
            Err(_) => defaults.default_locale,
        };

        let protected_markers = std::env::var("PROTECTED_MARKERS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|marker| !marker.is_empty())
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
            .unwrap_or(defaults.protected_markers);
        if protected_markers.is_empty() {
            return Err(AppError::configuration("PROTECTED_MARKERS must name at least one segment"));
        }

        let cookie_secure = std::env::var("COOKIE_SECURE")
            .map(|val| val.parse::<bool>())
            .unwrap_or(Ok(defaults.cookie_secure))
            .map_err(|_| AppError::configuration("COOKIE_SECURE must be true or false"))?;

        Ok(Self {
            default_locale,
            protected_markers,
            access_cookie: std::env::var("SESSION_COOKIE").unwrap_or(defaults.access_cookie),
            refresh_cookie: std::env::var("REFRESH_COOKIE").unwrap_or(defaults.refresh_cookie),
            cookie_secure,
            public_origin: std::env::var("PUBLIC_ORIGIN")
                .map(|origin| origin.trim_end_matches('/').to_string())
                .unwrap_or(defaults.public_origin),
        })
    }

    pub fn is_protected_segment(&self, segment: &str) -> bool {
        self.protected_markers.iter().any(|marker| marker == segment)
    }
}
