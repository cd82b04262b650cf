//! Canonical and root URL construction.

/// Builds absolute URLs for one request.
///
/// Host and secure flag come from the transport; the forced protocol and the
/// base path come from configuration.
#[derive(Debug, Clone)]
pub struct UrlBuilder<'a> {
    protocol_force: Option<&'a str>,
    secure: bool,
    host: &'a str,
    base: &'a str,
}

impl<'a> UrlBuilder<'a> {
    pub fn new(protocol_force: Option<&'a str>, secure: bool, host: &'a str, base: &'a str) -> Self {
        Self {
            protocol_force,
            secure,
            host,
            base,
        }
    }

    /// Forced protocol verbatim, else `https`/`http` from the secure flag.
    pub fn scheme(&self) -> &str {
        match self.protocol_force {
            Some(forced) if !forced.is_empty() => forced,
            _ if self.secure => "https",
            _ => "http",
        }
    }

    pub fn root_url(&self, include_base: bool) -> String {
        let tail = if include_base { self.base } else { "/" };
        format!("{}://{}{}", self.scheme(), self.host, tail)
    }

    pub fn canonical_url(&self, page_path: &str) -> String {
        let mut url = self.root_url(true);
        url.push_str(page_path);
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_from_secure_flag() {
        assert_eq!(UrlBuilder::new(None, false, "example.com", "/").scheme(), "http");
        assert_eq!(UrlBuilder::new(None, true, "example.com", "/").scheme(), "https");
    }

    #[test]
    fn test_forced_protocol_wins() {
        let urls = UrlBuilder::new(Some("https"), false, "example.com", "/");
        assert_eq!(urls.root_url(false), "https://example.com/");
    }

    #[test]
    fn test_root_url_with_and_without_base() {
        let urls = UrlBuilder::new(None, false, "example.com", "/site/");
        assert_eq!(urls.root_url(true), "http://example.com/site/");
        assert_eq!(urls.root_url(false), "http://example.com/");
    }

    #[test]
    fn test_canonical_url() {
        let urls = UrlBuilder::new(None, true, "example.com", "/site/");
        assert_eq!(urls.canonical_url("about"), "https://example.com/site/about");
        assert_eq!(urls.canonical_url(""), "https://example.com/site/");
    }
}
