//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use pagebase::config::ConfigStore;
use pagebase::lifecycle::Startup;
use pagebase::{HttpServer, Shutdown};

/// A site on disk: fragment files plus a TOML configuration file.
pub struct SiteDir {
    dir: TempDir,
}

impl SiteDir {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("pages")).unwrap();
        Self { dir }
    }

    /// Write fragment `name` (without extension).
    pub fn page(self, name: &str, body: &str) -> Self {
        std::fs::write(self.pages().join(format!("{name}.html")), body).unwrap();
        self
    }

    pub fn pages(&self) -> PathBuf {
        self.dir.path().join("pages")
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `site.toml` with `directory_pages` pointing at the fragments.
    pub fn config(&self, toml: &str) -> PathBuf {
        let path = self.dir.path().join("site.toml");
        let content = format!("directory_pages = \"{}/\"\n{toml}", self.pages().display());
        std::fs::write(&path, content).unwrap();
        path
    }
}

/// A server running on an ephemeral port.
pub struct RunningServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub config_updates: mpsc::UnboundedSender<ConfigStore>,
    pub handle: tokio::task::JoinHandle<Result<(), std::io::Error>>,
}

impl RunningServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Load `config` and serve the site on 127.0.0.1.
pub async fn start_server(config: &Path) -> RunningServer {
    let startup = Startup::load(Some(config)).unwrap();
    let site = startup
        .build_site(&pagebase::extensions::ExtensionRegistry::with_builtins())
        .unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (config_updates, updates_rx) = mpsc::unbounded_channel();
    let server = HttpServer::new(site, startup.server.clone());
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(async move { server.run(listener, updates_rx, server_shutdown).await });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    RunningServer {
        addr,
        shutdown,
        config_updates,
        handle,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}
