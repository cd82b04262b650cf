//! Startup orchestration.
//!
//! # Responsibilities
//! - Load the option store (file merged over defaults, or defaults alone)
//! - Build the site: validation, extensions, renderer
//! - Start background tasks (config watcher, metrics, signal handler)
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listener binds last (traffic only when the site is ready)

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::config::watcher::ConfigWatcher;
use crate::config::{load_config, ConfigError, ConfigStore, ObservabilityConfig, ServerConfig};
use crate::extensions::ExtensionRegistry;
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals::spawn_signal_handler;
use crate::observability::metrics;
use crate::render::RenderError;
use crate::site::{Site, SiteError};

/// Fatal startup failures.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("site error: {0}")]
    Site(#[from] SiteError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("invalid address '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config watcher error: {0}")]
    Watch(#[from] notify::Error),
}

/// Loaded configuration, before the site is built.
#[derive(Debug, Clone)]
pub struct Startup {
    path: Option<PathBuf>,
    store: ConfigStore,
    pub server: ServerConfig,
    pub observability: ObservabilityConfig,
}

impl Startup {
    /// Load `path` over the defaults, or use the defaults alone.
    pub fn load(path: Option<&Path>) -> Result<Self, StartupError> {
        let store = match path {
            Some(path) => load_config(path)?,
            None => ConfigStore::new(),
        };
        Self::from_store(store, path.map(Path::to_path_buf))
    }

    pub fn from_store(store: ConfigStore, path: Option<PathBuf>) -> Result<Self, StartupError> {
        Ok(Self {
            server: ServerConfig::from_store(&store)?,
            observability: ObservabilityConfig::from_store(&store)?,
            path,
            store,
        })
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Build the site from the loaded options.
    pub fn build_site(&self, registry: &ExtensionRegistry) -> Result<Site, StartupError> {
        let site = Site::builder(self.store.clone())
            .registry(registry.clone())
            .build()?;
        Ok(site)
    }

    /// Build the site and serve it until a stop signal arrives.
    pub async fn serve(
        mut self,
        registry: ExtensionRegistry,
        bind_override: Option<String>,
    ) -> Result<(), StartupError> {
        if let Some(address) = bind_override {
            self.server.bind_address = address;
        }

        let site = self.build_site(&registry)?;

        if self.observability.metrics_enabled {
            let address = &self.observability.metrics_address;
            let addr = address.parse().map_err(|source| StartupError::Address {
                address: address.clone(),
                source,
            })?;
            metrics::init_metrics(addr);
        }

        // keep the watcher alive for the life of the server
        let (_watcher, config_updates) = match (&self.path, self.server.watch_config) {
            (Some(path), true) => {
                let (watcher, updates) = ConfigWatcher::new(path);
                (Some(watcher.run()?), updates)
            }
            _ => {
                let (_, updates) = mpsc::unbounded_channel();
                (None, updates)
            }
        };

        let listener = TcpListener::bind(&self.server.bind_address).await?;
        tracing::info!(
            address = %listener.local_addr()?,
            max_connections = self.server.max_connections,
            request_timeout_secs = self.server.request_timeout_secs,
            watch_config = self.server.watch_config,
            "Listening for connections"
        );

        let shutdown = Shutdown::new();
        let signals = spawn_signal_handler(shutdown.clone());

        let server = HttpServer::new(site, self.server.clone()).with_registry(registry);
        let result = server.run(listener, config_updates, shutdown.subscribe()).await;
        signals.abort();

        result?;
        Ok(())
    }
}
