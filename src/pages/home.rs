use axum::extract::Path;
use axum::Json;
use serde::Serialize;

use crate::errors::AppResult;
use crate::i18n::{Locale, Translator};

use super::path_locale;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageLink {
    pub locale: Locale,
    pub href: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuickLink {
    pub title: &'static str,
    pub href: String,
}

/// Public landing page: language switcher plus entry points into the app.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomePage {
    pub locale: Locale,
    pub title: &'static str,
    pub current_language: &'static str,
    pub languages: Vec<LanguageLink>,
    pub links: Vec<QuickLink>,
}

impl HomePage {
    pub fn new(locale: Locale) -> Self {
        let tr = Translator::new(locale);
        let link = |key: &str, literal: &'static str, path: &str| QuickLink {
            title: tr.nav(key, literal),
            href: locale.localize(path),
        };

        Self {
            locale,
            title: tr.t("home", "title", "Young Leaders"),
            current_language: tr.t("home", "currentLanguage", "Current language"),
            languages: Locale::ALL
                .into_iter()
                .map(|other| LanguageLink {
                    locale: other,
                    href: other.localize("/"),
                    active: other == locale,
                })
                .collect(),
            links: vec![
                link("dashboard", "Dashboard", "/dashboard"),
                link("events", "Events", "/events"),
                link("settings", "Settings", "/settings"),
            ],
        }
    }
}

pub async fn home(Path(lang): Path<String>) -> AppResult<Json<HomePage>> {
    let locale = path_locale(&lang)?;
    Ok(Json(HomePage::new(locale)))
}
