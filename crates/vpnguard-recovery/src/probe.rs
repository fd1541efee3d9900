//! Endpoint health probe.
//!
//! One HTTP GET per call, no internal retries — retrying is the
//! orchestrator's job. The probe is bounded by the configured timeout so
//! a hung endpoint costs latency, not a hang.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

/// Health of the monitored endpoint as derived from one probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Up,
    Down,
}

/// Raw outcome of a single HTTP GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Status(u16),
    TransportError(String),
}

/// Capability interface for the HTTP prober.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn get(&self, url: &str) -> ProbeOutcome;
}

/// Classify a probe outcome.
///
/// Only HTTP 502 — the gateway-level "upstream unreachable" signal —
/// maps to Down. Every other status, and every transport error
/// (connection refused, timeout), maps to Up. This mapping is narrow by
/// observation, not by accident: widening it to treat transport errors
/// as Down would silently change which situations trigger recovery.
pub fn classify(outcome: &ProbeOutcome) -> HealthStatus {
    match outcome {
        ProbeOutcome::Status(502) => HealthStatus::Down,
        ProbeOutcome::Status(_) | ProbeOutcome::TransportError(_) => HealthStatus::Up,
    }
}

/// Probe the endpoint once and log the observed outcome and derived status.
pub async fn check_endpoint(prober: &dyn Prober, url: &str) -> HealthStatus {
    let outcome = prober.get(url).await;
    let status = classify(&outcome);
    match &outcome {
        ProbeOutcome::Status(code) => {
            info!(%url, code, status = ?status, "endpoint probed");
        }
        ProbeOutcome::TransportError(e) => {
            info!(%url, error = %e, status = ?status, "endpoint probe did not complete");
        }
    }
    status
}

/// HTTP/1.1 prober: raw TCP connect plus a hyper handshake, bounded by a
/// timeout. Speaks plain http; the monitored endpoint is a local URL.
pub struct HttpProber {
    timeout: Duration,
}

impl HttpProber {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn get(&self, url: &str) -> ProbeOutcome {
        let Some((authority, path)) = split_http_url(url) else {
            return ProbeOutcome::TransportError(format!("unsupported url: {url}"));
        };
        let address = if authority.contains(':') {
            authority.clone()
        } else {
            format!("{authority}:80")
        };

        let result = tokio::time::timeout(self.timeout, async {
            let stream = match tokio::net::TcpStream::connect(&address).await {
                Ok(s) => s,
                Err(e) => {
                    debug!(error = %e, %url, "probe connection failed");
                    return ProbeOutcome::TransportError(e.to_string());
                }
            };

            let io = hyper_util::rt::TokioIo::new(stream);
            let (mut sender, conn) = match hyper::client::conn::http1::handshake(io).await {
                Ok(pair) => pair,
                Err(e) => {
                    debug!(error = %e, %url, "probe handshake failed");
                    return ProbeOutcome::TransportError(e.to_string());
                }
            };

            // Drive the connection in the background.
            tokio::spawn(async move {
                let _ = conn.await;
            });

            let req = match http::Request::builder()
                .method("GET")
                .uri(path)
                .header("host", &authority)
                .header("user-agent", "vpnguard/0.1")
                .body(http_body_util::Empty::<bytes::Bytes>::new())
            {
                Ok(r) => r,
                Err(e) => return ProbeOutcome::TransportError(e.to_string()),
            };

            match sender.send_request(req).await {
                Ok(resp) => ProbeOutcome::Status(resp.status().as_u16()),
                Err(e) => {
                    debug!(error = %e, %url, "probe request failed");
                    ProbeOutcome::TransportError(e.to_string())
                }
            }
        })
        .await;

        match result {
            Ok(outcome) => outcome,
            Err(_) => {
                debug!(%url, "probe timed out");
                ProbeOutcome::TransportError("timed out".to_string())
            }
        }
    }
}

/// Split an http URL into (authority, path).
fn split_http_url(url: &str) -> Option<(String, String)> {
    let rest = url.strip_prefix("http://")?;
    let (authority, path) = match rest.find('/') {
        Some(i) => (&rest[..i], &rest[i..]),
        None => (rest, "/"),
    };
    if authority.is_empty() {
        None
    } else {
        Some((authority.to_string(), path.to_string()))
    }
}
