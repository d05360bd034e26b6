//! Health-check aggregation for the social-posting microservices.
//!
//! Each service builds one [`HealthRegistry`] at startup, registers a probe
//! per dependency (database, peer services), and serves the aggregate
//! report on `GET /health`.

pub mod cli;
pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::ServiceConfig;
pub use health::{HealthRegistry, HealthReport, OverallStatus, Probe, ProbeResult};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
