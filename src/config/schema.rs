//! Typed views of the option store.
//!
//! The store keeps untyped values so that extensions and fragments can read
//! anything; the core reads through these typed snapshots instead.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::loader::ConfigError;
use crate::config::store::ConfigStore;
use crate::routing::{BasePath, BaseStrip, RouteTable};

/// Site options used by the dispatch pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteSettings {
    /// Scheme to use for generated URLs regardless of the connection.
    pub protocol_force: Option<String>,

    /// Language → path → view table.
    pub pages_available: RouteTable,

    /// View rendered for the empty path and unknown paths.
    pub page_default: String,

    /// Title of the default view.
    pub page_default_title: Option<String>,

    /// Base path the site is served under (e.g. "/" or "/site/").
    pub page_base: String,

    /// How `page_base` is removed from request paths.
    pub page_base_strip: BaseStrip,

    /// Fragments rendered before the view, in order.
    pub page_include_before: Vec<String>,

    /// Fragments rendered after the view, in order.
    pub page_include_after: Vec<String>,

    /// Extension appended to every fragment name.
    pub page_extension: String,

    /// Directory holding fragment sources.
    pub directory_pages: PathBuf,

    /// Directory holding per-extension settings files.
    pub directory_extensions: PathBuf,

    /// Supported languages; `None` disables negotiation.
    pub languages_available: Option<Vec<String>>,

    /// Language used when nothing else matches.
    pub language_default: String,

    /// Query parameter carrying an explicit language choice.
    pub language_query: String,

    /// Cookie storing the language preference.
    pub language_cookie: String,

    /// Extensions to instantiate, in order.
    pub extensions: Vec<String>,
}

impl SiteSettings {
    /// Read every site option from `store`.
    pub fn from_store(store: &ConfigStore) -> Result<Self, ConfigError> {
        let languages_available: Option<Vec<String>> = store.get_as("languages_available")?;

        let mut pages_available: RouteTable = store.get_as("pages_available")?;
        if let Some(languages) = &languages_available {
            pages_available.order_by(languages);
        }

        Ok(Self {
            protocol_force: store.get_as("protocol_force")?,
            pages_available,
            page_default: store.get_as("page_default")?,
            page_default_title: store.get_as("page_default_title")?,
            page_base: store.get_as("page_base")?,
            page_base_strip: store.get_as("page_base_strip")?,
            page_include_before: store.get_as("page_include_before")?,
            page_include_after: store.get_as("page_include_after")?,
            page_extension: store.get_as("page_extension")?,
            directory_pages: store.get_as("directory_pages")?,
            directory_extensions: store.get_as("directory_extensions")?,
            languages_available,
            language_default: store.get_as("language_default")?,
            language_query: store.get_as("language_query")?,
            language_cookie: store.get_as("language_cookie")?,
            extensions: store.get_as("extensions")?,
        })
    }

    pub fn base_path(&self) -> BasePath {
        BasePath::new(self.page_base.clone(), self.page_base_strip)
    }

    /// Languages are negotiated only when a non-empty list is configured.
    pub fn languages(&self) -> Option<&[String]> {
        self.languages_available
            .as_deref()
            .filter(|languages| !languages.is_empty())
    }
}

/// HTTP server options (the `server` table).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum requests processed concurrently (backpressure).
    pub max_connections: usize,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Honour `X-Forwarded-Proto` from a fronting proxy.
    pub trust_forwarded_proto: bool,

    /// Host used for URLs when the request has no Host header.
    pub default_host: String,

    /// Reload the configuration file when it changes.
    pub watch_config: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_connections: 10_000,
            request_timeout_secs: 30,
            trust_forwarded_proto: false,
            default_host: "localhost".to_string(),
            watch_config: false,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability options (the `observability` table).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Pretty (development) or JSON (production) log lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_store(store: &ConfigStore) -> Result<Self, ConfigError> {
        store.get_as("server")
    }
}

impl ObservabilityConfig {
    pub fn from_store(store: &ConfigStore) -> Result<Self, ConfigError> {
        store.get_as("observability")
    }
}
