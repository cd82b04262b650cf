//! Fragment evaluation.
//!
//! # Responsibilities
//! - Turn one fragment source into text against the request scope
//! - Report missing sources as `FragmentNotFound`
//!
//! # Design Decisions
//! - Evaluation sits behind [`FragmentRenderer`] so hosts can plug their own
//! - [`FileFragments`] only substitutes `{{ name }}` placeholders with scalar
//!   scope values: no conditionals, loops or expressions
//! - Unknown placeholders are left in the output untouched

use std::borrow::Cow;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::{Captures, Regex};
use thiserror::Error;

use crate::render::scope::Scope;

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z0-9_\-]+(?:\.[A-Za-z0-9_\-]+)*)\s*\}\}")
            .expect("placeholder regex must compile")
    })
}

/// Errors raised while rendering a page.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A before/view/after fragment source does not exist.
    #[error("fragment '{name}' not found at {}", .path.display())]
    FragmentNotFound { name: String, path: PathBuf },

    /// The source exists but could not be read.
    #[error("failed to read fragment {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Evaluates one fragment source.
pub trait FragmentRenderer: Send + Sync {
    /// Render the fragment named `name`, located at `path`, against `scope`.
    fn render(&self, name: &str, path: &Path, scope: &mut Scope) -> Result<String, RenderError>;
}

/// Reads fragments from disk and fills in `{{ name }}` placeholders.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFragments;

impl FragmentRenderer for FileFragments {
    fn render(&self, name: &str, path: &Path, scope: &mut Scope) -> Result<String, RenderError> {
        let source = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => RenderError::FragmentNotFound {
                name: name.to_string(),
                path: path.to_path_buf(),
            },
            _ => RenderError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        Ok(substitute(&source, scope).into_owned())
    }
}

/// Replace every `{{ name }}` whose name resolves to a scalar in `scope`.
pub fn substitute<'a>(source: &'a str, scope: &Scope) -> Cow<'a, str> {
    placeholder_re().replace_all(source, |caps: &Captures<'_>| {
        scope
            .display(&caps[1])
            .unwrap_or_else(|| caps[0].to_string())
    })
}
