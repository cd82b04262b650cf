//! Language negotiation subsystem.
//!
//! # Data Flow
//! ```text
//! route language, ?lang=, lang cookie, Accept-Language
//!     → negotiator.rs (precedence, membership checks)
//!         → accept.rs (parse + rank header entries)
//!     → LanguageDecision { code, persist, source }
//! ```
//!
//! # Design Decisions
//! - Only runs when the site declares supported languages
//! - Unmatched preferences degrade to the default language, never an error
//! - Only route and query decisions ask the client to store a preference

pub mod accept;
pub mod negotiator;

pub use accept::{parse_accept_language, LanguagePreference};
pub use negotiator::{LanguageDecision, LanguageHints, LanguageNegotiator, LanguageSource};
