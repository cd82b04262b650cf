//! Extension subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     `extensions` option (manifest)
//!     → registry.rs (name → factory, settings from <directory_extensions>/<name>.toml)
//!     → Extensions (ordered, immutable)
//!
//! Per request:
//!     Extensions::populate(scope) → one scope value per extension name
//! ```
//!
//! # Design Decisions
//! - Factories are registered in code; nothing is discovered by file name
//! - Extensions see the option store only through get/set at construction

pub mod builtin;
pub mod registry;

pub use registry::{Extension, ExtensionContext, ExtensionError, ExtensionRegistry, Extensions};
