//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured fields: view, language, request id)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows through every log line of a request
//! - Metrics are cheap (atomic increments) and optional

pub mod logging;
pub mod metrics;
