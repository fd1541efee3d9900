//! Dependent recovery policy.
//!
//! One sequential pass over the freshly discovered dependent set, then an
//! unconditional secondary sweep. The pass stops at the first runtime
//! command failure (containment); the sweep re-inspects every discovered
//! dependent and starts any still not running (catch-up for whatever the
//! early exit skipped). The two halves belong together: removing the
//! sweep drops unrecovered dependents, removing the early exit changes
//! the failure semantics.

use tracing::{info, warn};
use vpnguard_runtime::RuntimeClient;

use crate::config::RecoveryConfig;
use crate::discovery;
use crate::lifecycle;

/// Outcome of one dependent recovery pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    Clean,
    /// A runtime command failed; the rest of the pass was skipped.
    PartialFailure,
}

/// Recover every container carrying the membership label, sequentially.
pub async fn recover_dependents(
    runtime: &dyn RuntimeClient,
    config: &RecoveryConfig,
) -> PassOutcome {
    let members =
        match discovery::discover_members(runtime, &config.label_key, &config.label_value).await {
            Ok(members) => members,
            Err(e) => {
                warn!(error = %e, "dependent discovery failed");
                return PassOutcome::PartialFailure;
            }
        };

    let mut outcome = PassOutcome::Clean;
    for name in &members {
        let state = lifecycle::run_state(runtime, name).await;
        let result = if state.needs_start() {
            info!(dependent = %name, ?state, "dependent is not running, starting it");
            lifecycle::start(runtime, name).await
        } else {
            info!(dependent = %name, "dependent is running, restarting it");
            lifecycle::restart(runtime, name).await
        };

        match result {
            Ok(()) => {
                lifecycle::wait_until_running(
                    runtime,
                    name,
                    config.start_wait(),
                    config.poll_interval(),
                )
                .await;
            }
            Err(e) => {
                warn!(dependent = %name, error = %e, "lifecycle command failed, skipping remaining dependents this pass");
                outcome = PassOutcome::PartialFailure;
                break;
            }
        }
    }

    sweep(runtime, &members).await;
    outcome
}

/// Re-check every discovered dependent and start any still not running.
async fn sweep(runtime: &dyn RuntimeClient, members: &[String]) {
    for name in members {
        let state = lifecycle::run_state(runtime, name).await;
        if state.needs_start() {
            info!(dependent = %name, ?state, "sweep found dependent not running, starting it");
            if let Err(e) = lifecycle::start(runtime, name).await {
                warn!(dependent = %name, error = %e, "sweep start failed");
            }
        }
    }
}
