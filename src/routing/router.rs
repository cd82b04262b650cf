//! Route resolution: request path → view.
//!
//! # Responsibilities
//! - Strip the configured base path
//! - Look the remainder up in the route table, language by language
//! - Fall back to the default view for empty or unknown paths
//!
//! # Design Decisions
//! - First language in table order that knows the path wins
//! - Unknown paths degrade to the default view rather than a not-found error
//! - Pure function of its inputs: no state survives between calls

use serde::Serialize;

use crate::routing::base::BasePath;
use crate::routing::table::RouteTable;

/// The page a request resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPage {
    /// Path after base stripping; empty for the default page.
    pub path: String,
    /// View identifier.
    pub view: String,
    /// Display title, if one is configured.
    pub title: Option<String>,
    /// Language encoded by the route, `None` when it must be negotiated.
    pub language: Option<String>,
}

impl ResolvedPage {
    fn fallback(default_view: &str, default_title: Option<&str>) -> Self {
        Self {
            path: String::new(),
            view: default_view.to_string(),
            title: default_title.map(str::to_string),
            language: None,
        }
    }

    pub fn is_default(&self) -> bool {
        self.path.is_empty()
    }
}

/// Resolve `request_path` against `table`.
pub fn resolve(
    request_path: &str,
    table: &RouteTable,
    base: &BasePath,
    default_view: &str,
    default_title: Option<&str>,
) -> ResolvedPage {
    let stripped = match base.strip(request_path) {
        Some(path) if !path.is_empty() => path,
        _ => return ResolvedPage::fallback(default_view, default_title),
    };

    match table.lookup(stripped) {
        Some((language, descriptor)) => ResolvedPage {
            path: stripped.to_string(),
            view: descriptor.view.clone(),
            title: descriptor.title.clone(),
            language: Some(language.to_string()),
        },
        None => {
            tracing::debug!(path = %stripped, "No route for path, using default view");
            ResolvedPage::fallback(default_view, default_title)
        }
    }
}
