//! Reachability probing

use std::time::Duration;

use async_trait::async_trait;

use crate::status::Status;

/// Bounded-time reachability check of one target.
///
/// The classification is deliberately coarse, liveness rather than health:
/// the probed targets are arbitrary self-hosted services whose status
/// semantics the system does not understand.
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait Prober: Send + Sync {
    /// Probe one address. Resolves within the configured timeout and never
    /// errors: anything short of a reachable response classifies as offline.
    async fn probe(&self, target: &str, verify_tls: bool) -> Status;
}

/// Production prober using reqwest.
///
/// Two prebuilt clients so the certificate policy is a per-target choice;
/// both enforce the same request timeout.
pub struct HttpProber {
    tolerant: reqwest::Client,
    strict: reqwest::Client,
}

impl HttpProber {
    /// Build a prober whose probes resolve within `timeout`
    pub fn new(timeout: Duration) -> crate::Result<Self> {
        let tolerant = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| crate::LaunchpadError::Http(format!("Building HTTP client: {}", e)))?;
        let strict = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| crate::LaunchpadError::Http(format!("Building HTTP client: {}", e)))?;
        Ok(Self { tolerant, strict })
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, target: &str, verify_tls: bool) -> Status {
        let client = if verify_tls {
            &self.strict
        } else {
            &self.tolerant
        };

        match client.get(target).send().await {
            Ok(response) => {
                let code = response.status();
                if code.is_success() || code.is_redirection() {
                    tracing::debug!("Probe {} -> {} (online)", target, code);
                    Status::Online
                } else {
                    tracing::debug!("Probe {} -> {} (offline)", target, code);
                    Status::Offline
                }
            }
            Err(e) => {
                tracing::debug!("Probe {} failed: {}", target, e);
                Status::Offline
            }
        }
    }
}
