//! Page composition: before fragments, view, after fragments.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::render::fragment::{FileFragments, FragmentRenderer, RenderError};
use crate::render::scope::Scope;

/// Composes a page out of fragments found under one directory.
#[derive(Clone)]
pub struct Renderer {
    directory: PathBuf,
    extension: String,
    fragments: Arc<dyn FragmentRenderer>,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("directory", &self.directory)
            .field("extension", &self.extension)
            .finish_non_exhaustive()
    }
}

impl Renderer {
    /// Renderer reading fragment files with [`FileFragments`].
    pub fn new(directory: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self::with_fragments(directory, extension, Arc::new(FileFragments))
    }

    pub fn with_fragments(
        directory: impl Into<PathBuf>,
        extension: impl Into<String>,
        fragments: Arc<dyn FragmentRenderer>,
    ) -> Self {
        Self {
            directory: directory.into(),
            extension: extension.into(),
            fragments,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Source location of a fragment: directory + prefix + name + extension.
    ///
    /// The directory is joined textually, as configured (`./pages/` + `fr-` +
    /// `home` + `.html`).
    pub fn fragment_path(&self, prefix: &str, name: &str) -> PathBuf {
        let mut path = self.directory.clone().into_os_string();
        path.push(prefix);
        path.push(name);
        path.push(&self.extension);
        PathBuf::from(path)
    }

    /// Render `before`, then `view`, then `after`, in order, into one string.
    ///
    /// Nothing is returned unless every fragment renders.
    pub fn render(
        &self,
        prefix: &str,
        before: &[String],
        view: &str,
        after: &[String],
        scope: &mut Scope,
    ) -> Result<String, RenderError> {
        let names = before
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(view))
            .chain(after.iter().map(String::as_str));

        let mut output = String::new();
        for name in names {
            let path = self.fragment_path(prefix, name);
            tracing::trace!(fragment = %name, path = %path.display(), "Rendering fragment");
            output.push_str(&self.fragments.render(name, &path, scope)?);
        }
        Ok(output)
    }
}
