//! Bounded-time reachability probing.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

/// Liveness check for a playback URL.
///
/// A trait so selection logic can be tested without touching the network.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Best-effort liveness check. `false` means unreachable or timed out;
    /// a probe never errors.
    async fn probe(&self, url: &str, headers: &[(String, String)]) -> bool;
}

/// HTTP prober using a HEAD request with a GET-range fallback.
///
/// Ad-hoc file CDNs frequently reject HEAD with 405/501, so a failed HEAD
/// falls back to requesting the first byte. Each request carries its own
/// timeout.
pub struct ReachabilityProber {
    client: reqwest::Client,
    per_probe_timeout: Duration,
}

impl ReachabilityProber {
    pub fn new(per_probe_timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            per_probe_timeout,
        }
    }

    fn apply_headers(
        mut request: reqwest::RequestBuilder,
        headers: &[(String, String)],
    ) -> reqwest::RequestBuilder {
        for (name, value) in headers {
            request = request.header(name, value);
        }
        request
    }
}

#[async_trait]
impl Prober for ReachabilityProber {
    async fn probe(&self, url: &str, headers: &[(String, String)]) -> bool {
        let head = Self::apply_headers(self.client.head(url), headers)
            .timeout(self.per_probe_timeout)
            .send()
            .await;

        match head {
            Ok(response) if response.status().is_success() => return true,
            Ok(response)
                if response.status() == reqwest::StatusCode::METHOD_NOT_ALLOWED
                    || response.status() == reqwest::StatusCode::NOT_IMPLEMENTED =>
            {
                debug!("HEAD rejected ({}), retrying with ranged GET", response.status());
            }
            Ok(response) => {
                debug!("probe failed: HTTP {}", response.status());
                return false;
            }
            Err(e) => {
                debug!("probe failed: {}", e);
                return false;
            }
        }

        let get = Self::apply_headers(self.client.get(url), headers)
            .header(reqwest::header::RANGE, "bytes=0-0")
            .timeout(self.per_probe_timeout)
            .send()
            .await;

        match get {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("ranged GET probe failed: {}", e);
                false
            }
        }
    }
}
