//! Response handling and transformation.
//!
//! # Responsibilities
//! - Turn a dispatched page into an HTTP response
//! - Emit the language preference cookie and `Content-Language`
//! - Map dispatch failures to a generic 500
//!
//! # Design Decisions
//! - The body is sent whole; a failed render sends none of it
//! - Failure details go to the log, never to the client

use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::site::PageResponse;

const HTML: &str = "text/html; charset=utf-8";

impl IntoResponse for PageResponse {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(HTML));

        if let Some(decision) = &self.language {
            match HeaderValue::from_str(&decision.code) {
                Ok(value) => {
                    headers.insert(header::CONTENT_LANGUAGE, value);
                }
                Err(_) => tracing::warn!(language = %decision.code, "Language code is not a valid header value"),
            }
        }

        if let Some(cookie) = &self.language_cookie {
            match HeaderValue::from_str(&cookie.header_value()) {
                Ok(value) => {
                    headers.insert(header::SET_COOKIE, value);
                }
                Err(_) => tracing::warn!(cookie = %cookie.name, "Language cookie is not a valid header value"),
            }
        }

        (StatusCode::OK, headers, self.body).into_response()
    }
}

/// Generic error page; the cause is logged by the caller.
pub fn error_response(status: StatusCode) -> Response {
    let reason = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        "<!DOCTYPE html><html><head><title>{code} {reason}</title></head><body><h1>{code} {reason}</h1></body></html>",
        code = status.as_u16(),
    );
    (status, [(header::CONTENT_TYPE, HTML)], body).into_response()
}
