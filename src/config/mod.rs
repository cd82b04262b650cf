//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML/JSON)
//!     → loader.rs (parse into a mapping)
//!     → store.rs (merge over built-in defaults)
//!     → schema.rs (typed SiteSettings / ServerConfig)
//!     → validation.rs (semantic checks)
//!     → Site (immutable, shared via Arc)
//!
//! On file change (server.watch_config):
//!     watcher.rs detects change
//!     → loader.rs loads + validates
//!     → new Site built and swapped atomically
//!     → requests already running keep the old Site
//! ```
//!
//! # Design Decisions
//! - Options stay untyped in the store so fragments and extensions can read
//!   arbitrary keys; the core reads typed snapshots
//! - Every option has a default; unknown keys are allowed
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod store;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, load_validated_config, ConfigError};
pub use schema::{LogFormat, ObservabilityConfig, ServerConfig, SiteSettings};
pub use store::ConfigStore;
pub use validation::{validate_settings, ValidationError};
