//! Base-path stripping.
//!
//! # Design Decisions
//! - `Characters` (default) is a literal left-trim of every character that
//!   occurs in the base path, not a prefix removal: with base `/a`, both
//!   `/a/b` and `aa/b` lose their leading `/`/`a` run
//! - `Prefix` removes the base only as an exact prefix; paths outside the
//!   base do not belong to the site

use serde::{Deserialize, Serialize};

/// How the configured base path is removed from request paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseStrip {
    #[default]
    Characters,
    Prefix,
}

/// The configured base path plus its stripping mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasePath {
    base: String,
    mode: BaseStrip,
}

impl BasePath {
    pub fn new(base: impl Into<String>, mode: BaseStrip) -> Self {
        Self {
            base: base.into(),
            mode,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.base
    }

    /// Remove the base from `path`.
    ///
    /// Returns `None` when the path lies outside the base (prefix mode only).
    pub fn strip<'a>(&self, path: &'a str) -> Option<&'a str> {
        match self.mode {
            BaseStrip::Characters => {
                Some(path.trim_start_matches(|c: char| self.base.contains(c)))
            }
            BaseStrip::Prefix => {
                if let Some(rest) = path.strip_prefix(self.base.as_str()) {
                    return Some(rest);
                }
                // "/site" for base "/site/"
                let bare = self.base.trim_end_matches('/');
                if !bare.is_empty() && path == bare {
                    return Some("");
                }
                None
            }
        }
    }
}
