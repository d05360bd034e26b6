//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Health checks and HTTP requests produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, JSON in production)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows through every request span
//! - Metrics recording is a no-op until a recorder is installed

pub mod logging;
pub mod metrics;
