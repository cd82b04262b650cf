//! Language decision for one request.
//!
//! # Responsibilities
//! - Apply the precedence: route → query → cookie → Accept-Language → default
//! - Report whether the decision should be persisted back to the client
//!
//! # Design Decisions
//! - Query and cookie values must match a supported code exactly
//! - Header tags are lower-cased before the membership test
//! - A route-encoded language is trusted as-is (the route table defines it)
//! - Stateless: the same inputs always give the same decision

use std::fmt;

use serde::Serialize;

use crate::i18n::accept::parse_accept_language;

/// Where a language decision came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageSource {
    Route,
    Query,
    Cookie,
    AcceptLanguage,
    Default,
}

impl LanguageSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageSource::Route => "route",
            LanguageSource::Query => "query",
            LanguageSource::Cookie => "cookie",
            LanguageSource::AcceptLanguage => "accept_language",
            LanguageSource::Default => "default",
        }
    }
}

impl fmt::Display for LanguageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The chosen language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageDecision {
    pub code: String,
    /// The client should store this code as its preference.
    pub persist: bool,
    pub source: LanguageSource,
}

impl LanguageDecision {
    fn new(code: &str, source: LanguageSource) -> Self {
        Self {
            code: code.to_string(),
            persist: matches!(source, LanguageSource::Route | LanguageSource::Query),
            source,
        }
    }
}

/// Language hints carried by one request.
#[derive(Debug, Clone, Copy, Default)]
pub struct LanguageHints<'a> {
    /// Language implied by the resolved route.
    pub explicit: Option<&'a str>,
    /// Value of the language query parameter.
    pub query: Option<&'a str>,
    /// Value of the stored preference cookie.
    pub cookie: Option<&'a str>,
    /// Raw `Accept-Language` header.
    pub accept_language: Option<&'a str>,
}

/// Picks one supported language per request.
#[derive(Debug, Clone)]
pub struct LanguageNegotiator {
    supported: Vec<String>,
    default: String,
}

impl LanguageNegotiator {
    pub fn new(supported: Vec<String>, default: impl Into<String>) -> Self {
        Self {
            supported,
            default: default.into(),
        }
    }

    pub fn supported(&self) -> &[String] {
        &self.supported
    }

    pub fn default_language(&self) -> &str {
        &self.default
    }

    pub fn is_supported(&self, code: &str) -> bool {
        self.supported.iter().any(|s| s == code)
    }

    pub fn negotiate(&self, hints: &LanguageHints<'_>) -> LanguageDecision {
        if let Some(code) = hints.explicit.filter(|c| !c.is_empty()) {
            return LanguageDecision::new(code, LanguageSource::Route);
        }

        if let Some(code) = hints.query.filter(|c| self.is_supported(c)) {
            return LanguageDecision::new(code, LanguageSource::Query);
        }

        if let Some(code) = hints.cookie.filter(|c| self.is_supported(c)) {
            return LanguageDecision::new(code, LanguageSource::Cookie);
        }

        if let Some(header) = hints.accept_language {
            let ranked = parse_accept_language(header);
            if let Some(preference) = ranked.iter().find(|p| self.is_supported(&p.primary)) {
                return LanguageDecision::new(&preference.primary, LanguageSource::AcceptLanguage);
            }
        }

        LanguageDecision::new(&self.default, LanguageSource::Default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn negotiator() -> LanguageNegotiator {
        LanguageNegotiator::new(vec!["en".into(), "fr".into()], "en")
    }

    #[test]
    fn test_explicit_overrides_everything() {
        let decision = negotiator().negotiate(&LanguageHints {
            explicit: Some("fr"),
            query: Some("en"),
            cookie: Some("en"),
            accept_language: Some("en"),
        });
        assert_eq!(decision.code, "fr");
        assert!(decision.persist);
        assert_eq!(decision.source, LanguageSource::Route);
    }

    #[test]
    fn test_query_persisted() {
        let decision = negotiator().negotiate(&LanguageHints {
            query: Some("fr"),
            cookie: Some("en"),
            ..Default::default()
        });
        assert_eq!(decision.code, "fr");
        assert!(decision.persist);
        assert_eq!(decision.source, LanguageSource::Query);
    }

    #[test]
    fn test_unsupported_query_falls_to_cookie() {
        let decision = negotiator().negotiate(&LanguageHints {
            query: Some("xx"),
            cookie: Some("fr"),
            accept_language: Some("en"),
            ..Default::default()
        });
        assert_eq!(decision.code, "fr");
        assert!(!decision.persist);
        assert_eq!(decision.source, LanguageSource::Cookie);
    }

    #[test]
    fn test_query_is_case_sensitive() {
        let decision = negotiator().negotiate(&LanguageHints {
            query: Some("FR"),
            ..Default::default()
        });
        assert_eq!(decision.source, LanguageSource::Default);
        assert_eq!(decision.code, "en");
    }

    #[test]
    fn test_header_quality_wins() {
        let decision = negotiator().negotiate(&LanguageHints {
            accept_language: Some("fr;q=0.5, en;q=0.9"),
            ..Default::default()
        });
        assert_eq!(decision.code, "en");
        assert!(!decision.persist);
        assert_eq!(decision.source, LanguageSource::AcceptLanguage);
    }

    #[test]
    fn test_header_quality_compared_precisely() {
        let decision = negotiator().negotiate(&LanguageHints {
            accept_language: Some("fr;q=0.999999999, en"),
            ..Default::default()
        });
        assert_eq!(decision.code, "en");
        assert_eq!(decision.source, LanguageSource::AcceptLanguage);
    }

    #[test]
    fn test_header_skips_unsupported() {
        let decision = negotiator().negotiate(&LanguageHints {
            accept_language: Some("de, ja;q=0.9, FR-ca;q=0.3"),
            ..Default::default()
        });
        assert_eq!(decision.code, "fr");
    }

    #[test]
    fn test_default_when_nothing_matches() {
        let n = LanguageNegotiator::new(vec!["en".into(), "fr".into()], "fr");
        let decision = n.negotiate(&LanguageHints {
            query: Some("de"),
            cookie: Some("it"),
            accept_language: Some("es, pt;q=0.4"),
            ..Default::default()
        });
        assert_eq!(decision.code, "fr");
        assert!(!decision.persist);
        assert_eq!(decision.source, LanguageSource::Default);
    }

    #[test]
    fn test_header_result_always_supported_or_default() {
        let n = negotiator();
        let headers = ["xx", "de;q=1", "*", "en-US", "fr;q=0.01", ", ,", "q=0.5"];
        for header in headers {
            let decision = n.negotiate(&LanguageHints {
                accept_language: Some(header),
                ..Default::default()
            });
            assert!(n.is_supported(&decision.code) || decision.code == n.default_language());
        }
    }

    #[test]
    fn test_idempotent() {
        let n = negotiator();
        let hints = LanguageHints {
            accept_language: Some("fr;q=0.8, en;q=0.8"),
            ..Default::default()
        };
        let first = n.negotiate(&hints);
        let second = n.negotiate(&hints);
        assert_eq!(first, second);
        assert_eq!(first.code, "fr");
    }
}
