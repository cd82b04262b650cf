//! The site: one explicitly constructed context object per configuration.
//!
//! # Data Flow
//! ```text
//! RequestContext
//!     → routing::resolve (path → ResolvedPage)
//!     → i18n::LanguageNegotiator (only if languages are configured)
//!     → routing::UrlBuilder (canonical / root URLs)
//!     → Scope (options + request values + extension values)
//!     → render::Renderer (before… view after…)
//!     → PageResponse
//! ```
//!
//! # Design Decisions
//! - Built once at startup (or on reload) and never mutated afterwards;
//!   shared between requests behind an `Arc`
//! - Options are read into typed settings at build time, so a missing or
//!   malformed option stops startup instead of a request
//! - Extensions get the option store before it is frozen

pub mod context;

use std::sync::Arc;

use thiserror::Error;

use crate::config::{validate_settings, ConfigError, ConfigStore, SiteSettings};
use crate::extensions::{ExtensionError, ExtensionRegistry, Extensions};
use crate::i18n::{LanguageHints, LanguageNegotiator};
use crate::observability::metrics;
use crate::render::{FileFragments, FragmentRenderer, RenderError, Renderer, Scope};
use crate::routing::{resolve, UrlBuilder};

pub use context::{LanguageCookie, PageResponse, RequestContext};

/// Errors raised while building a [`Site`].
#[derive(Debug, Error)]
pub enum SiteError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Extension(#[from] ExtensionError),
}

/// Builder for [`Site`].
pub struct SiteBuilder {
    config: ConfigStore,
    registry: ExtensionRegistry,
    fragments: Arc<dyn FragmentRenderer>,
}

impl SiteBuilder {
    /// Use `registry` instead of the built-in extensions.
    pub fn registry(mut self, registry: ExtensionRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Evaluate fragments with `fragments` instead of [`FileFragments`].
    pub fn fragments(mut self, fragments: Arc<dyn FragmentRenderer>) -> Self {
        self.fragments = fragments;
        self
    }

    pub fn build(self) -> Result<Site, SiteError> {
        let mut config = self.config;

        let settings = checked_settings(&config)?;
        let extensions = self.registry.load(
            &settings.extensions,
            &settings.directory_extensions,
            &mut config,
        )?;

        // extensions may have changed options
        let settings = if extensions.is_empty() {
            settings
        } else {
            checked_settings(&config)?
        };

        let negotiator = settings
            .languages()
            .map(|languages| LanguageNegotiator::new(languages.to_vec(), settings.language_default.clone()));

        let renderer = Renderer::with_fragments(
            settings.directory_pages.clone(),
            settings.page_extension.clone(),
            self.fragments,
        );

        tracing::info!(
            routes = settings.pages_available.languages().map(|l| l.pages.len()).sum::<usize>(),
            languages = ?settings.languages(),
            extensions = extensions.len(),
            pages = %settings.directory_pages.display(),
            "Site ready"
        );

        Ok(Site {
            config,
            settings,
            negotiator,
            extensions,
            renderer,
        })
    }
}

fn checked_settings(config: &ConfigStore) -> Result<SiteSettings, ConfigError> {
    let settings = SiteSettings::from_store(config)?;
    validate_settings(&settings).map_err(ConfigError::Validation)?;
    Ok(settings)
}

/// A configured site, ready to dispatch requests.
#[derive(Debug)]
pub struct Site {
    config: ConfigStore,
    settings: SiteSettings,
    negotiator: Option<LanguageNegotiator>,
    extensions: Extensions,
    renderer: Renderer,
}

impl Site {
    /// Start building a site from an option store.
    pub fn builder(config: ConfigStore) -> SiteBuilder {
        SiteBuilder {
            config,
            registry: ExtensionRegistry::with_builtins(),
            fragments: Arc::new(FileFragments),
        }
    }

    /// Build a site with the built-in extensions and file fragments.
    pub fn new(config: ConfigStore) -> Result<Self, SiteError> {
        Self::builder(config).build()
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    pub fn settings(&self) -> &SiteSettings {
        &self.settings
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Resolve, negotiate and render one request.
    ///
    /// Either the whole page is returned or nothing is.
    pub fn dispatch(&self, request: &RequestContext) -> Result<PageResponse, RenderError> {
        let settings = &self.settings;

        let page = resolve(
            &request.path,
            &settings.pages_available,
            &settings.base_path(),
            &settings.page_default,
            settings.page_default_title.as_deref(),
        );

        let mut scope = Scope::from_config(&self.config);
        scope.set("this_page", page.view.clone());

        let language = self.negotiator.as_ref().map(|negotiator| {
            negotiator.negotiate(&LanguageHints {
                explicit: page.language.as_deref(),
                query: request.query_language.as_deref(),
                cookie: request.cookie_language.as_deref(),
                accept_language: request.accept_language.as_deref(),
            })
        });

        let prefix = match &language {
            Some(decision) => {
                metrics::record_language_decision(decision.source.as_str());
                scope.set("language", decision.code.clone());
                format!("{}-", decision.code)
            }
            None => String::new(),
        };

        let urls = UrlBuilder::new(
            settings.protocol_force.as_deref(),
            request.secure,
            &request.host,
            &settings.page_base,
        );
        let url_canonical = urls.canonical_url(&page.path);
        scope.set("url_canonical", url_canonical.clone());
        scope.set("url_root", urls.root_url(true));
        scope.set("url_page", page.path.clone());
        scope.set("title", page.title.clone());

        self.extensions.populate(&mut scope);

        tracing::debug!(
            path = %request.path,
            view = %page.view,
            language = language.as_ref().map(|d| d.code.as_str()).unwrap_or("-"),
            language_source = language.as_ref().map(|d| d.source.as_str()).unwrap_or("-"),
            "Page resolved"
        );

        let body = self.renderer.render(
            &prefix,
            &settings.page_include_before,
            &page.view,
            &settings.page_include_after,
            &mut scope,
        )?;

        let language_cookie = language
            .as_ref()
            .filter(|decision| decision.persist)
            .map(|decision| LanguageCookie {
                name: settings.language_cookie.clone(),
                value: decision.code.clone(),
                path: settings.page_base.clone(),
            });

        Ok(PageResponse {
            body,
            page,
            language,
            language_cookie,
            url_canonical,
        })
    }
}
