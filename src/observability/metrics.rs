//! Metrics collection and exposition.
//!
//! # Metrics
//! - `health_http_requests_total` (counter): requests by method, status
//! - `health_http_request_duration_seconds` (histogram): request latency
//! - `health_checks_total` (counter): aggregate checks by overall status
//! - `health_probe_duration_seconds` (histogram): probe latency by dependency
//! - `health_dependency_up` (gauge): 1=healthy, 0=unhealthy, by dependency
//!
//! Recording is a no-op until a recorder is installed with [`init_metrics`].

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::health::{OverallStatus, ProbeResult};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a served HTTP request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    let method = method.to_string();
    counter!(
        "health_http_requests_total",
        "method" => method.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("health_http_request_duration_seconds", "method" => method)
        .record(start.elapsed().as_secs_f64());
}

/// Record one aggregate health check.
pub fn record_health_check(status: OverallStatus) {
    counter!("health_checks_total", "status" => status.as_str()).increment(1);
}

/// Record the outcome of one probe.
pub fn record_probe(dependency: &str, result: &ProbeResult) {
    let dependency = dependency.to_string();
    if let Some(ms) = result.response_time {
        histogram!("health_probe_duration_seconds", "dependency" => dependency.clone())
            .record(ms as f64 / 1000.0);
    }
    gauge!("health_dependency_up", "dependency" => dependency)
        .set(if result.is_healthy() { 1.0 } else { 0.0 });
}
