//! Peer-service probes.
//!
//! # Responsibilities
//! - Check that a peer HTTP service answers its health endpoint
//! - Provide the permissive default used when no real check is wired in
//!
//! # Design Decisions
//! - Only HTTP 200 counts as healthy; any other status reports `HTTP <code>`
//! - The request timeout is the probe's own latency bound
//! - Connection errors and timeouts become unhealthy results, never errors

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

use crate::health::probe::{elapsed_ms, Probe, ProbeError, ProbeResult};

/// Probe that always reports healthy with zero latency.
///
/// Default for peers whose reachability is not actively checked.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProbe;

#[async_trait]
impl Probe for NoopProbe {
    async fn probe(&self) -> ProbeResult {
        ProbeResult::healthy(0)
    }
}

/// Active HTTP check of a peer service.
#[derive(Debug, Clone)]
pub struct PeerServiceProbe {
    client: reqwest::Client,
    url: Url,
    timeout: Duration,
}

impl PeerServiceProbe {
    pub fn new(url: Url, timeout: Duration) -> Self {
        Self::with_client(reqwest::Client::new(), url, timeout)
    }

    /// Share an existing client (connection pool, proxy settings).
    pub fn with_client(client: reqwest::Client, url: Url, timeout: Duration) -> Self {
        Self { client, url, timeout }
    }

    async fn request(&self) -> Result<StatusCode, ProbeError> {
        let response = self
            .client
            .get(self.url.clone())
            .header("user-agent", "service-health-check")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| if e.is_timeout() { ProbeError::Timeout } else { ProbeError::Http(e) })?;

        Ok(response.status())
    }
}

#[async_trait]
impl Probe for PeerServiceProbe {
    async fn probe(&self) -> ProbeResult {
        let start = Instant::now();
        match self.request().await {
            Ok(StatusCode::OK) => ProbeResult::healthy(elapsed_ms(start)),
            Ok(status) => {
                tracing::warn!(url = %self.url, status = %status, "Peer health check failed: non-success status");
                ProbeResult::unhealthy(Some(elapsed_ms(start)), format!("HTTP {}", status.as_u16()))
            }
            Err(e) => {
                tracing::warn!(url = %self.url, error = %e, "Peer health check failed");
                ProbeResult::unhealthy(Some(elapsed_ms(start)), e.to_string())
            }
        }
    }
}
