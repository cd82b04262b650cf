//! Rendering subsystem.
//!
//! # Data Flow
//! ```text
//! prefix ("" or "fr-"), before[], view, after[], Scope
//!     → renderer.rs (ordered composition, path naming)
//!     → fragment.rs (evaluate one source against the scope)
//!     → buffered String (returned whole, or not at all)
//! ```
//!
//! # Design Decisions
//! - Output is accumulated in memory; a failure discards it
//! - One scope per request, passed by `&mut` to every fragment in order
//! - Fragment evaluation is pluggable; the default only fills placeholders

pub mod fragment;
pub mod renderer;
pub mod scope;

pub use fragment::{FileFragments, FragmentRenderer, RenderError};
pub use renderer::Renderer;
pub use scope::Scope;
