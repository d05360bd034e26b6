//! Probe contracts.
//!
//! A [`Probe`] is a no-argument async check of one external dependency.
//! Implementations must not fail: any error is folded into an unhealthy
//! [`ProbeResult`] carrying the error message.

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome of a single probe invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Healthy,
    Unhealthy,
}

/// Snapshot of one probe invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    pub status: ProbeStatus,

    /// Wall-clock latency in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProbeResult {
    pub fn healthy(response_time_ms: u64) -> Self {
        Self {
            status: ProbeStatus::Healthy,
            response_time: Some(response_time_ms),
            error: None,
        }
    }

    pub fn unhealthy(response_time_ms: Option<u64>, error: impl Into<String>) -> Self {
        Self {
            status: ProbeStatus::Unhealthy,
            response_time: response_time_ms,
            error: Some(error.into()),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == ProbeStatus::Healthy
    }
}

/// Errors a connectivity test may report. Never escapes a probe.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("Request timeout")]
    Timeout,

    #[error("{0}")]
    Other(String),
}

/// A single dependency reachability check.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self) -> ProbeResult;
}

/// A user-supplied connectivity test: `Ok(true)` when the dependency
/// answered, `Ok(false)` when it refused, `Err` when the attempt failed.
#[async_trait]
pub trait ConnectivityTest: Send + Sync {
    async fn test(&self) -> Result<bool, ProbeError>;
}

/// Milliseconds elapsed since `start`, saturating.
pub(crate) fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
