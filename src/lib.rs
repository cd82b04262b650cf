//! Multilingual page dispatcher library

pub mod config;
pub mod extensions;
pub mod http;
pub mod i18n;
pub mod lifecycle;
pub mod observability;
pub mod render;
pub mod routing;
pub mod site;

pub use config::ConfigStore;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use site::{PageResponse, RequestContext, Site};
