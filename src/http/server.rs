//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the page handler as fallback for every path
//! - Wire up middleware (request ID, tracing, timeout, concurrency limit)
//! - Run dispatch on the blocking pool (fragment loading reads files)
//! - Swap in reloaded sites without dropping requests
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ConfigStore, ServerConfig};
use crate::extensions::ExtensionRegistry;
use crate::http::request::{request_context, request_id, UuidRequestId, X_REQUEST_ID};
use crate::http::response::error_response;
use crate::observability::metrics;
use crate::site::Site;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Current site; replaced wholesale on reload.
    pub site: Arc<ArcSwap<Site>>,
    pub server: Arc<ServerConfig>,
}

/// HTTP server hosting one site.
pub struct HttpServer {
    router: Router,
    site: Arc<ArcSwap<Site>>,
    config: ServerConfig,
    registry: ExtensionRegistry,
}

impl HttpServer {
    /// Create a new HTTP server for `site`.
    pub fn new(site: Site, config: ServerConfig) -> Self {
        let site = Arc::new(ArcSwap::from_pointee(site));
        let state = AppState {
            site: site.clone(),
            server: Arc::new(config.clone()),
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            site,
            config,
            registry: ExtensionRegistry::with_builtins(),
        }
    }

    /// Registry used to rebuild the site when the configuration reloads.
    pub fn with_registry(mut self, registry: ExtensionRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(X_REQUEST_ID.clone(), UuidRequestId))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id(request),
                )
            }))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID.clone()))
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
            .layer(ConcurrencyLimitLayer::new(config.max_connections.max(1)));

        Router::new()
            .fallback(page_handler)
            .with_state(state)
            .layer(middleware)
    }

    /// The router, for serving it elsewhere or driving it in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Handle to the live site.
    pub fn site(&self) -> Arc<ArcSwap<Site>> {
        self.site.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Configurations arriving on `config_updates` replace the site; a
    /// configuration that fails to build is logged and ignored.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<ConfigStore>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let site = self.site.clone();
        let registry = self.registry.clone();
        tokio::spawn(async move {
            while let Some(store) = config_updates.recv().await {
                let registry = registry.clone();
                let built =
                    tokio::task::spawn_blocking(move || Site::builder(store).registry(registry).build())
                        .await;
                match built {
                    Ok(Ok(new_site)) => {
                        site.store(Arc::new(new_site));
                        tracing::info!("Configuration reloaded");
                    }
                    Ok(Err(e)) => {
                        tracing::error!(error = %e, "Reloaded configuration rejected, keeping current site")
                    }
                    Err(e) => tracing::error!(error = %e, "Site rebuild task failed"),
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Page handler for every path and method.
async fn page_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();

    // one site snapshot for the whole request
    let site = state.site.load_full();
    let ctx = request_context(&request, site.settings(), &state.server);
    let path = ctx.path.clone();

    match tokio::task::spawn_blocking(move || site.dispatch(&ctx)).await {
        Ok(Ok(page)) => {
            let language = page.language.as_ref().map(|d| d.code.clone()).unwrap_or_default();
            metrics::record_request(&page.page.view, &language, 200, start_time);
            tracing::debug!(
                view = %page.page.view,
                language = %language,
                bytes = page.body.len(),
                "Page rendered"
            );
            page.into_response()
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, path = %path, "Page render failed");
            metrics::record_request("-", "-", 500, start_time);
            error_response(StatusCode::INTERNAL_SERVER_ERROR)
        }
        Err(e) => {
            tracing::error!(error = %e, "Render task failed");
            metrics::record_request("-", "-", 500, start_time);
            error_response(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
