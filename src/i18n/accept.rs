//! `Accept-Language` parsing with quality ranking.
//!
//! # Design Decisions
//! - Entries are comma separated; each must match the whole pattern
//!   `primary(-subtag)*[;q=factor]`, case-insensitively
//! - A factor is `1` or `0.` followed by digits; anything else (`q=2`,
//!   `q=1.0`, `q=abc`) drops the entry
//! - Qualities compare numerically; ties keep header order (stable sort)
//! - The primary subtag is lower-cased

use std::cmp::Ordering;
use std::sync::OnceLock;

use regex::Regex;

fn entry_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^([a-z]{1,8})(?:-[a-z0-9]{1,8})*\s*(?:;\s*q\s*=\s*(1|0\.[0-9]+))?$")
            .expect("accept-language regex must compile")
    })
}

/// One ranked entry of an `Accept-Language` header.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguagePreference {
    /// Full tag as written, e.g. `en-GB`.
    pub tag: String,
    /// Lower-cased primary subtag, e.g. `en`.
    pub primary: String,
    /// Quality in `[0, 1]`; 1 when omitted.
    pub quality: f64,
}

/// Parse `header` into preferences ranked by quality, highest first.
pub fn parse_accept_language(header: &str) -> Vec<LanguagePreference> {
    let mut preferences: Vec<LanguagePreference> = header
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(parse_entry)
        .collect();

    // sort_by is stable
    preferences.sort_by(|a, b| b.quality.partial_cmp(&a.quality).unwrap_or(Ordering::Equal));
    preferences
}

fn parse_entry(entry: &str) -> Option<LanguagePreference> {
    let captures = entry_re().captures(entry)?;
    let primary = captures.get(1)?.as_str().to_ascii_lowercase();
    let quality = match captures.get(2) {
        Some(factor) => factor.as_str().parse::<f64>().ok()?,
        None => 1.0,
    };

    let tag = entry
        .split(';')
        .next()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    Some(LanguagePreference {
        tag,
        primary,
        quality,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primaries(header: &str) -> Vec<String> {
        parse_accept_language(header)
            .into_iter()
            .map(|p| p.primary)
            .collect()
    }

    #[test]
    fn test_ranked_by_quality() {
        assert_eq!(primaries("fr;q=0.5, en;q=0.9"), vec!["en", "fr"]);
    }

    #[test]
    fn test_missing_quality_is_one() {
        let prefs = parse_accept_language("de, en;q=0.8");
        assert_eq!(prefs[0].primary, "de");
        assert_eq!(prefs[0].quality, 1.0);
    }

    #[test]
    fn test_near_one_ranks_below_implicit_one() {
        assert_eq!(primaries("fr;q=0.999999999, en"), vec!["en", "fr"]);
        assert_eq!(primaries("de;q=0.12345678901, it;q=0.12345678902"), vec!["it", "de"]);
    }

    #[test]
    fn test_stable_on_ties() {
        assert_eq!(primaries("es;q=0.7, it;q=0.7, pt;q=0.7"), vec!["es", "it", "pt"]);
        assert_eq!(primaries("nl, sv, da"), vec!["nl", "sv", "da"]);
    }

    #[test]
    fn test_numeric_not_lexical() {
        // "0.10" > "0.9" lexically on the second char would be wrong
        assert_eq!(primaries("a;q=0.10, b;q=0.9"), vec!["b", "a"]);
    }

    #[test]
    fn test_subtag_reduced_to_primary() {
        let prefs = parse_accept_language("en-GB;q=0.8, fr-CA");
        assert_eq!(prefs[0].tag, "fr-CA");
        assert_eq!(prefs[0].primary, "fr");
        assert_eq!(prefs[1].tag, "en-GB");
        assert_eq!(prefs[1].primary, "en");
    }

    #[test]
    fn test_primary_lowercased() {
        assert_eq!(primaries("EN-us"), vec!["en"]);
    }

    #[test]
    fn test_invalid_quality_excluded() {
        assert_eq!(primaries("en;q=2, fr;q=abc, de;q=1.0, it;q=0.3"), vec!["it"]);
    }

    #[test]
    fn test_wildcard_and_garbage_excluded() {
        assert_eq!(primaries("*, 12, en"), vec!["en"]);
        assert!(parse_accept_language("").is_empty());
    }

    #[test]
    fn test_whitespace_tolerated() {
        let prefs = parse_accept_language(" fr ; q = 0.4 ,en ;q=0.6");
        assert_eq!(prefs.len(), 2);
        assert_eq!(prefs[0].primary, "en");
        assert!((prefs[1].quality - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_quality() {
        assert_eq!(primaries("fr;q=0.0, en;q=0.1"), vec!["en", "fr"]);
        assert_eq!(primaries("fr;q=0, en;q=0.1"), vec!["en"]);
    }

    #[test]
    fn test_multiple_subtags() {
        assert_eq!(primaries("zh-Hant-TW;q=0.9"), vec!["zh"]);
    }
}
