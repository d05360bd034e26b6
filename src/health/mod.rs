//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (lifecycle/startup.rs):
//!     Config → one probe per dependency
//!     → registry.rs (name → probe, insertion ordered)
//!
//! Per request (GET /health):
//!     registry.check_health()
//!     → aggregator.rs (poll every probe concurrently, settle all)
//!     → derive overall status from the individual results
//!     → report.rs (HealthReport, serialized as JSON)
//! ```
//!
//! # Design Decisions
//! - Probes never fail: every error becomes an unhealthy `ProbeResult`
//! - A panicking probe is isolated and reported as unhealthy
//! - No aggregate timeout; each probe bounds its own latency
//! - The registry is immutable once shared with the HTTP layer

pub mod aggregator;
pub mod connectivity;
pub mod peer;
pub mod probe;
pub mod registry;
pub mod report;

pub use aggregator::StatusPolicy;
pub use connectivity::{ConnectivityProbe, FnConnectivity, PgConnectivity};
pub use peer::{NoopProbe, PeerServiceProbe};
pub use probe::{ConnectivityTest, Probe, ProbeError, ProbeResult, ProbeStatus};
pub use registry::HealthRegistry;
pub use report::{HealthReport, OverallStatus};
