//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout, metrics)
//!     → /health handlers
//!     → HealthRegistry::check_health()
//!     → JSON response
//! ```

pub mod server;

pub use server::{build_router, AppState, HttpServer, X_REQUEST_ID};
