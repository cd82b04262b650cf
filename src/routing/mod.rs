//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Request path
//!     → base.rs (strip configured base path)
//!     → table.rs (per-language path → view lookup)
//!     → router.rs (first matching language, or default view)
//!     → ResolvedPage
//!
//! ResolvedPage.path
//!     → url.rs (canonical / root URLs)
//! ```
//!
//! # Design Decisions
//! - Route table loaded at startup, immutable at runtime
//! - Exact path lookup, no patterns
//! - Deterministic: language order is explicit
//! - Unknown paths resolve to the default view

pub mod base;
pub mod router;
pub mod table;
pub mod url;

pub use base::{BasePath, BaseStrip};
pub use router::{resolve, ResolvedPage};
pub use table::{LanguageRoutes, RouteTable, ViewDescriptor};
pub use url::UrlBuilder;
