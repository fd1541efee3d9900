//! Operator-visibility diagnostics.
//!
//! Fetches the external identity (IP, hostname, city) as seen *through*
//! the gateway and logs a single line. Purely informational: every
//! failure here is swallowed into a debug log and never affects control
//! flow.

use serde::Deserialize;
use tracing::{debug, info};
use vpnguard_runtime::RuntimeClient;

#[derive(Debug, Deserialize)]
struct ExternalIdentity {
    ip: Option<String>,
    hostname: Option<String>,
    city: Option<String>,
}

/// Log the gateway's external identity, if it can be determined.
pub async fn report_external_identity(
    runtime: &dyn RuntimeClient,
    gateway: &str,
    lookup_url: &str,
) {
    if lookup_url.is_empty() {
        return;
    }

    let body = match runtime
        .exec(gateway, &["wget", "-qO-", "-T", "10", lookup_url])
        .await
    {
        Ok(body) => body,
        Err(e) => {
            debug!(%gateway, error = %e, "external identity lookup failed");
            return;
        }
    };

    match serde_json::from_str::<ExternalIdentity>(&body) {
        Ok(identity) => {
            info!(
                gateway = %gateway,
                ip = identity.ip.as_deref().unwrap_or("?"),
                hostname = identity.hostname.as_deref().unwrap_or("?"),
                city = identity.city.as_deref().unwrap_or("?"),
                "external identity via gateway"
            );
        }
        Err(e) => {
            debug!(%gateway, error = %e, "external identity response was not parseable");
        }
    }
}
