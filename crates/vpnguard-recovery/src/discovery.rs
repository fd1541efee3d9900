//! Dependent discovery by membership label.
//!
//! The dependent set is not a stable collection: the runtime's own
//! restart policy may recreate a crashed container under a new identity
//! between any two calls. Callers must re-discover at every use site
//! rather than reuse a list across a restart boundary, so there is
//! deliberately no caching here.

use tracing::{debug, warn};
use vpnguard_runtime::{RuntimeClient, RuntimeResult};

/// Resolve the current names of all containers carrying the membership
/// label, running or stopped, in the order the runtime reports them.
pub async fn discover_members(
    runtime: &dyn RuntimeClient,
    key: &str,
    value: &str,
) -> RuntimeResult<Vec<String>> {
    let members = runtime.query_by_label(key, value).await?;
    if members.is_empty() {
        warn!(label = %format!("{key}={value}"), "no dependents carry the membership label");
    } else {
        debug!(label = %format!("{key}={value}"), count = members.len(), ?members, "dependents discovered");
    }
    Ok(members)
}
