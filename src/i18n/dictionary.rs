//! Per-locale translation tables.
//!
//! Dictionaries are compiled into the binary and parsed once per locale.
//! The schema is strict: unknown sections are rejected and the `version`
//! field must match [`DICTIONARY_VERSION`]. A dictionary that fails to parse
//! degrades to an empty table (logged once), so lookups fall through to the
//! English table and finally to the literal supplied at the call site.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::Locale;

pub const DICTIONARY_VERSION: u32 = 1;

type Table = BTreeMap<String, String>;

#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("invalid dictionary at `{path}`: {message}")]
    Parse { path: String, message: String },
    #[error("dictionary version {found} does not match expected {expected}")]
    Version { found: u32, expected: u32 },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Dictionary {
    pub version: u32,
    #[serde(default)]
    pub home: Table,
    #[serde(default)]
    pub navigation: Table,
    #[serde(default)]
    pub page_descriptions: Table,
    #[serde(default)]
    pub auth: Table,
    #[serde(default)]
    pub user: Table,
    #[serde(default)]
    pub header: Table,
}

impl Dictionary {
    pub fn parse(raw: &str) -> Result<Self, DictionaryError> {
        let de = &mut serde_json::Deserializer::from_str(raw);
        let dict: Dictionary =
            serde_path_to_error::deserialize(de).map_err(|err| DictionaryError::Parse {
                path: err.path().to_string(),
                message: err.inner().to_string(),
            })?;

        if dict.version != DICTIONARY_VERSION {
            return Err(DictionaryError::Version {
                found: dict.version,
                expected: DICTIONARY_VERSION,
            });
        }

        Ok(dict)
    }

    /// Section tables by their JSON name.
    pub fn sections(&self) -> [(&'static str, &Table); 6] {
        [
            ("home", &self.home),
            ("navigation", &self.navigation),
            ("pageDescriptions", &self.page_descriptions),
            ("auth", &self.auth),
            ("user", &self.user),
            ("header", &self.header),
        ]
    }

    pub fn section(&self, name: &str) -> Option<&Table> {
        self.sections()
            .into_iter()
            .find(|(section, _)| *section == name)
            .map(|(_, table)| table)
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)?.get(key).map(String::as_str)
    }

    /// `section.key` paths present in `self` but absent from `other`.
    pub fn missing_in(&self, other: &Dictionary) -> Vec<String> {
        let theirs: BTreeSet<String> = other.key_paths().collect();
        self.key_paths().filter(|path| !theirs.contains(path)).collect()
    }

    fn key_paths(&self) -> impl Iterator<Item = String> + '_ {
        self.sections().into_iter().flat_map(|(section, table)| {
            table.keys().map(move |key| format!("{section}.{key}"))
        })
    }
}

fn raw_dictionary(locale: Locale) -> &'static str {
    match locale {
        Locale::En => include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/dictionaries/en.json")),
        Locale::De => include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/dictionaries/de.json")),
    }
}

fn load(locale: Locale) -> Dictionary {
    match Dictionary::parse(raw_dictionary(locale)) {
        Ok(dict) => dict,
        Err(err) => {
            tracing::error!(error = %err, locale = locale.as_str(), "failed to load dictionary");
            Dictionary::default()
        }
    }
}

/// Returns the translation table for `locale`.
pub fn get_dictionary(locale: Locale) -> &'static Dictionary {
    static EN: OnceLock<Dictionary> = OnceLock::new();
    static DE: OnceLock<Dictionary> = OnceLock::new();
    match locale {
        Locale::En => EN.get_or_init(|| load(Locale::En)),
        Locale::De => DE.get_or_init(|| load(Locale::De)),
    }
}

/// Default-resolution layer over the dictionaries.
///
/// Lookups try the requested locale, then English, then the literal.
#[derive(Debug, Clone, Copy)]
pub struct Translator {
    pub locale: Locale,
    primary: &'static Dictionary,
    fallback: &'static Dictionary,
}

impl Translator {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            primary: get_dictionary(locale),
            fallback: get_dictionary(Locale::En),
        }
    }

    pub fn lookup(&self, section: &str, key: &str) -> Option<&'static str> {
        self.primary
            .get(section, key)
            .or_else(|| self.fallback.get(section, key))
    }

    pub fn t<'a>(&self, section: &str, key: &str, literal: &'a str) -> &'a str {
        self.lookup(section, key).unwrap_or(literal)
    }

    pub fn nav(&self, key: &str, literal: &'static str) -> &'static str {
        self.t("navigation", key, literal)
    }

    pub fn dictionary(&self) -> &'static Dictionary {
        self.primary
    }
}
