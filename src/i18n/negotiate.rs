use super::{Locale, DEFAULT_LOCALE};

/// One entry of an `accept-language` header.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageRange {
    pub tag: String,
    pub quality: f32,
}

/// Parses an `accept-language` header into ranges ordered by preference.
///
/// Malformed entries are skipped, `q=0` entries are excluded and ties keep
/// header order.
pub fn parse_accept_language(header: &str) -> Vec<LanguageRange> {
    let mut ranges: Vec<LanguageRange> = header
        .split(',')
        .filter_map(|part| {
            let mut pieces = part.split(';');
            let tag = pieces.next()?.trim();
            if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '*') {
                return None;
            }

            let mut quality = 1.0_f32;
            for param in pieces {
                let (key, value) = param.split_once('=')?;
                if key.trim().eq_ignore_ascii_case("q") {
                    quality = value.trim().parse::<f32>().ok()?;
                }
            }

            if !(0.0..=1.0).contains(&quality) || quality == 0.0 {
                return None;
            }

            Some(LanguageRange {
                tag: tag.to_ascii_lowercase(),
                quality,
            })
        })
        .collect();

    // sort_by is stable, so equal weights keep header order
    ranges.sort_by(|a, b| b.quality.total_cmp(&a.quality));
    ranges
}

/// Best-fit match of a single range against the supported locales.
fn best_fit(tag: &str, default: Locale) -> Option<Locale> {
    if tag == "*" {
        return Some(default);
    }
    if let Some(locale) = Locale::from_code(tag) {
        return Some(locale);
    }
    let primary = tag.split('-').next().unwrap_or(tag);
    Locale::from_code(primary)
}

/// Picks the locale for a request from its `accept-language` header.
///
/// Never fails: absent, malformed or unmatched headers yield the default.
pub fn negotiate(accept_language: Option<&str>) -> Locale {
    negotiate_or(accept_language, DEFAULT_LOCALE)
}

/// [`negotiate`] with a configured default instead of [`DEFAULT_LOCALE`].
pub fn negotiate_or(accept_language: Option<&str>, default: Locale) -> Locale {
    let Some(header) = accept_language else {
        return default;
    };

    parse_accept_language(header)
        .iter()
        .find_map(|range| best_fit(&range.tag, default))
        .unwrap_or(default)
}
