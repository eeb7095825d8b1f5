//! Locales, `accept-language` negotiation and the compiled-in dictionaries.

mod dictionary;
mod negotiate;

pub use dictionary::{get_dictionary, Dictionary, DictionaryError, Translator, DICTIONARY_VERSION};
pub use negotiate::{negotiate, negotiate_or, parse_accept_language, LanguageRange};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A supported UI language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    De,
}

pub const DEFAULT_LOCALE: Locale = Locale::En;

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::De];

    pub const fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::De => "de",
        }
    }

    /// Exact, case-insensitive code match. Region subtags are not accepted
    /// here; use [`negotiate`] for header values.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|locale| locale.as_str().eq_ignore_ascii_case(code))
    }

    /// Splits a leading `/{locale}` segment off a path.
    ///
    /// Returns the locale and the remaining path (always starting with `/`),
    /// or `None` when the first segment is not a supported locale.
    pub fn strip_prefix(path: &str) -> Option<(Locale, &str)> {
        let trimmed = path.strip_prefix('/')?;
        let (first, rest) = match trimmed.find('/') {
            Some(idx) => (&trimmed[..idx], &trimmed[idx..]),
            None => (trimmed, ""),
        };
        let locale = Self::ALL.into_iter().find(|l| l.as_str() == first)?;
        Some((locale, if rest.is_empty() { "/" } else { rest }))
    }

    /// Formats `/{locale}{path}` for an app-relative path.
    pub fn localize(self, path: &str) -> String {
        if path.is_empty() || path == "/" {
            format!("/{}", self.as_str())
        } else if path.starts_with('/') {
            format!("/{}{}", self.as_str(), path)
        } else {
            format!("/{}/{}", self.as_str(), path)
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| format!("unsupported locale: {s}"))
    }
}
