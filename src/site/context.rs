//! Transport-independent request inputs and dispatch output.

use serde::Serialize;

use crate::i18n::LanguageDecision;
use crate::routing::ResolvedPage;

/// Everything the core reads from one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Request path without the query string.
    pub path: String,
    /// Value of the language query parameter, if present.
    pub query_language: Option<String>,
    /// Value of the language preference cookie, if present.
    pub cookie_language: Option<String>,
    /// Raw `Accept-Language` header.
    pub accept_language: Option<String>,
    /// Host (from the `Host` header) used for absolute URLs.
    pub host: String,
    /// Whether the client connection is secure.
    pub secure: bool,
}

impl RequestContext {
    pub fn new(path: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            host: host.into(),
            ..Self::default()
        }
    }

    pub fn with_query_language(mut self, code: impl Into<String>) -> Self {
        self.query_language = Some(code.into());
        self
    }

    pub fn with_cookie_language(mut self, code: impl Into<String>) -> Self {
        self.cookie_language = Some(code.into());
        self
    }

    pub fn with_accept_language(mut self, header: impl Into<String>) -> Self {
        self.accept_language = Some(header.into());
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }
}

/// Cookie the transport should set to remember a language choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageCookie {
    pub name: String,
    pub value: String,
    pub path: String,
}

impl LanguageCookie {
    /// `Set-Cookie` header value.
    pub fn header_value(&self) -> String {
        format!("{}={}; Path={}; SameSite=Lax", self.name, self.value, self.path)
    }
}

/// Result of dispatching one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResponse {
    /// Fully composed page.
    pub body: String,
    pub page: ResolvedPage,
    /// `None` when the site declares no languages.
    pub language: Option<LanguageDecision>,
    /// Set when the language decision should be persisted.
    pub language_cookie: Option<LanguageCookie>,
    pub url_canonical: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_header_value() {
        let cookie = LanguageCookie {
            name: "lang".into(),
            value: "fr".into(),
            path: "/".into(),
        };
        assert_eq!(cookie.header_value(), "lang=fr; Path=/; SameSite=Lax");
    }

    #[test]
    fn test_builder() {
        let ctx = RequestContext::new("/about", "example.com")
            .with_query_language("fr")
            .with_accept_language("en")
            .secure(true);
        assert_eq!(ctx.path, "/about");
        assert_eq!(ctx.query_language.as_deref(), Some("fr"));
        assert_eq!(ctx.cookie_language, None);
        assert!(ctx.secure);
    }
}
