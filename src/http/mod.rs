//! HTTP transport subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, blocking-pool dispatch)
//!     → request.rs (request ID, RequestContext extraction)
//!     → site::Site::dispatch (resolve, negotiate, render)
//!     → response.rs (headers, language cookie, error mapping)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{request_context, UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
