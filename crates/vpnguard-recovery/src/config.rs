//! vpnguard.toml configuration surface.
//!
//! Durations are human strings ("5s", "500ms", "2m"); parse failures fall
//! back to the documented defaults rather than aborting — a recovery run
//! with a slightly off config is better than no recovery run.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration consumed by the recovery core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    /// Name of the gateway container. Identity is this name, never the
    /// runtime ID behind it.
    pub gateway: String,
    /// Endpoint probed to decide whether recovery is needed (http URL).
    pub health_url: String,
    /// Label key marking dependent containers.
    pub label_key: String,
    /// Label value marking dependent containers.
    pub label_value: String,
    /// Maximum time to wait for a container to reach Running ("90s").
    pub start_wait: String,
    /// Interval between run-state polls while waiting ("3s").
    pub poll_interval: String,
    /// Maximum number of recovery cycles before giving up.
    pub max_retries: u32,
    /// Delay between a recovery pass and the re-probe ("30s").
    pub stabilization: String,
    /// Per-probe timeout ("10s").
    pub probe_timeout: String,
    /// IP literal pinged from inside the gateway for the reachability check.
    pub check_ip: String,
    /// DNS name pinged from inside the gateway for the reachability check.
    pub check_host: String,
    /// JSON IP-info endpoint fetched through the gateway for the operator
    /// visibility line. Empty disables diagnostics.
    pub lookup_url: String,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            gateway: "vpn".to_string(),
            health_url: "http://127.0.0.1:8388/".to_string(),
            label_key: "com.vpnguard.dependent".to_string(),
            label_value: "true".to_string(),
            start_wait: "90s".to_string(),
            poll_interval: "3s".to_string(),
            max_retries: 3,
            stabilization: "30s".to_string(),
            probe_timeout: "10s".to_string(),
            check_ip: "1.1.1.1".to_string(),
            check_host: "one.one.one.one".to_string(),
            lookup_url: "https://ipinfo.io/json".to_string(),
        }
    }
}

impl RecoveryConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn start_wait(&self) -> Duration {
        parse_duration(&self.start_wait).unwrap_or(Duration::from_secs(90))
    }

    pub fn poll_interval(&self) -> Duration {
        parse_duration(&self.poll_interval).unwrap_or(Duration::from_secs(3))
    }

    pub fn stabilization(&self) -> Duration {
        parse_duration(&self.stabilization).unwrap_or(Duration::from_secs(30))
    }

    pub fn probe_timeout(&self) -> Duration {
        parse_duration(&self.probe_timeout).unwrap_or(Duration::from_secs(10))
    }
}

/// Parse a duration string like "5s", "500ms", "1m".
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(secs) = s.strip_suffix('s') {
        if let Some(ms) = secs.strip_suffix('m') {
            ms.parse::<u64>().ok().map(Duration::from_millis)
        } else {
            secs.parse::<u64>().ok().map(Duration::from_secs)
        }
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.parse::<u64>().ok().map(|m| Duration::from_secs(m * 60))
    } else {
        s.parse::<u64>().ok().map(Duration::from_secs)
    }
}
