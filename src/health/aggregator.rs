//! Probe aggregation.
//!
//! # Responsibilities
//! - Poll every registered probe concurrently and wait for all of them
//! - Isolate failures: a panicking probe becomes an unhealthy result
//! - Derive the overall status from the individual results
//!
//! # Status derivation
//! ```text
//! DegradeOnFailure (default):
//!     no dependencies / all healthy → healthy
//!     any unhealthy                 → degraded
//!
//! Tiered:
//!     no dependencies / all healthy → healthy
//!     some unhealthy                → degraded
//!     all unhealthy                 → unhealthy
//! ```

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use futures_util::future::{join_all, FutureExt};
use serde::{Deserialize, Serialize};

use crate::health::probe::{elapsed_ms, Probe, ProbeResult};
use crate::health::report::OverallStatus;
use crate::observability::metrics;

/// A probe registered under a dependency name.
pub type NamedProbe = (String, Box<dyn Probe>);

/// How individual probe results fold into one overall status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusPolicy {
    /// Any failure degrades the service; never reports `unhealthy`.
    #[default]
    DegradeOnFailure,
    /// `unhealthy` when every dependency failed, `degraded` when some did.
    Tiered,
}

impl StatusPolicy {
    pub fn derive<'a, I>(&self, results: I) -> OverallStatus
    where
        I: IntoIterator<Item = &'a ProbeResult>,
    {
        let (total, failed) = results.into_iter().fold((0usize, 0usize), |(total, failed), r| {
            (total + 1, failed + usize::from(!r.is_healthy()))
        });

        match (self, failed) {
            (_, 0) => OverallStatus::Healthy,
            (StatusPolicy::Tiered, f) if f == total => OverallStatus::Unhealthy,
            _ => OverallStatus::Degraded,
        }
    }
}

/// Run every probe concurrently; never fails fast.
///
/// Results come back in the order of `probes`.
pub async fn settle_all(probes: &[NamedProbe]) -> Vec<(String, ProbeResult)> {
    let checks = probes.iter().map(|(name, probe)| async move {
        let result = run_isolated(&**probe).await;

        if result.is_healthy() {
            tracing::debug!(dependency = %name, response_time_ms = ?result.response_time, "Dependency healthy");
        } else {
            tracing::warn!(
                dependency = %name,
                response_time_ms = ?result.response_time,
                error = result.error.as_deref().unwrap_or(""),
                "Dependency unhealthy"
            );
        }
        metrics::record_probe(name, &result);

        (name.clone(), result)
    });

    join_all(checks).await
}

async fn run_isolated(probe: &dyn Probe) -> ProbeResult {
    let start = Instant::now();
    match AssertUnwindSafe(probe.probe()).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => ProbeResult::unhealthy(Some(elapsed_ms(start)), panic_message(payload.as_ref())),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "Unknown error".to_string()
    }
}
