//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4)
//! - Extract the core's inputs from an HTTP request: path, language query
//!   parameter, language cookie, Accept-Language, host, secure flag
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The method is ignored: every method gets the page for its path
//! - `X-Forwarded-Proto` is only believed when explicitly trusted

use std::collections::HashMap;

use axum::extract::Query;
use axum::http::{header, HeaderMap, HeaderName, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::config::{ServerConfig, SiteSettings};
use crate::site::RequestContext;

/// Header carrying the request ID.
pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Generates a UUID v4 for requests that arrive without an ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        Uuid::new_v4()
            .to_string()
            .parse()
            .ok()
            .map(RequestId::new)
    }
}

/// Request ID previously set on the request, or "unknown".
pub fn request_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Build the core's view of `request`.
pub fn request_context<B>(
    request: &Request<B>,
    settings: &SiteSettings,
    server: &ServerConfig,
) -> RequestContext {
    let headers = request.headers();
    let uri = request.uri();

    let query_language = Query::<HashMap<String, String>>::try_from_uri(uri)
        .ok()
        .and_then(|Query(mut params)| params.remove(&settings.language_query));

    let host = header_str(headers, header::HOST.as_str())
        .map(str::to_string)
        .or_else(|| uri.authority().map(|a| a.to_string()))
        .unwrap_or_else(|| server.default_host.clone());

    let secure = server.trust_forwarded_proto
        && header_str(headers, X_FORWARDED_PROTO)
            .and_then(|v| v.split(',').next())
            .is_some_and(|proto| proto.trim().eq_ignore_ascii_case("https"));

    RequestContext {
        path: uri.path().to_string(),
        query_language,
        cookie_language: cookie_value(headers, &settings.language_cookie),
        accept_language: header_str(headers, header::ACCEPT_LANGUAGE.as_str()).map(str::to_string),
        host,
        secure,
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// First value of cookie `name` across all `Cookie` headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|line| line.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigStore;
    use axum::body::Body;

    fn settings() -> SiteSettings {
        SiteSettings::from_store(&ConfigStore::new()).unwrap()
    }

    #[test]
    fn test_extracts_all_inputs() {
        let req = Request::builder()
            .uri("/fr/apropos?lang=fr&x=1")
            .header("Host", "example.com")
            .header("Cookie", "session=abc; lang=en")
            .header("Accept-Language", "fr;q=0.5, en;q=0.9")
            .body(Body::empty())
            .unwrap();

        let ctx = request_context(&req, &settings(), &ServerConfig::default());
        assert_eq!(ctx.path, "/fr/apropos");
        assert_eq!(ctx.query_language.as_deref(), Some("fr"));
        assert_eq!(ctx.cookie_language.as_deref(), Some("en"));
        assert_eq!(ctx.accept_language.as_deref(), Some("fr;q=0.5, en;q=0.9"));
        assert_eq!(ctx.host, "example.com");
        assert!(!ctx.secure);
    }

    #[test]
    fn test_default_host() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let ctx = request_context(&req, &settings(), &ServerConfig::default());
        assert_eq!(ctx.host, "localhost");
        assert_eq!(ctx.query_language, None);
        assert_eq!(ctx.cookie_language, None);
    }

    #[test]
    fn test_forwarded_proto_needs_trust() {
        let req = Request::builder()
            .uri("/")
            .header("X-Forwarded-Proto", "https")
            .body(Body::empty())
            .unwrap();

        let untrusted = request_context(&req, &settings(), &ServerConfig::default());
        assert!(!untrusted.secure);

        let server = ServerConfig {
            trust_forwarded_proto: true,
            ..Default::default()
        };
        let trusted = request_context(&req, &settings(), &server);
        assert!(trusted.secure);
    }

    #[test]
    fn test_cookie_across_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, "a=1".parse().unwrap());
        headers.append(header::COOKIE, "lang=\"fr\"; b=2".parse().unwrap());
        assert_eq!(cookie_value(&headers, "lang").as_deref(), Some("fr"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn test_request_id_is_uuid() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let id = UuidRequestId.make_request_id(&req).unwrap();
        let text = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(text).is_ok());
    }
}
