//! Gateway recovery policy.
//!
//! A stopped gateway needs no diagnosis, only startup; a running gateway
//! that cannot reach the outside world needs a hard restart. The
//! reachability check runs *through* the gateway: two independent pings
//! from inside the container, one IP literal and one DNS name, and both
//! must succeed to count as healthy.

use tracing::{info, warn};
use vpnguard_runtime::{RunState, RuntimeClient};

use crate::config::RecoveryConfig;
use crate::diagnostics;
use crate::lifecycle;

/// Diagnose and repair the gateway container.
///
/// Command failures are logged and absorbed: the orchestrator's retry
/// loop is the recovery mechanism for a failed recovery action.
pub async fn recover_gateway(runtime: &dyn RuntimeClient, config: &RecoveryConfig) {
    let name = config.gateway.as_str();
    let state = lifecycle::run_state(runtime, name).await;

    match state {
        RunState::Stopped | RunState::Unknown => {
            info!(gateway = %name, ?state, "gateway is not running, starting it");
            if let Err(e) = lifecycle::start(runtime, name).await {
                warn!(gateway = %name, error = %e, "gateway start failed");
                return;
            }
            lifecycle::wait_until_running(
                runtime,
                name,
                config.start_wait(),
                config.poll_interval(),
            )
            .await;
        }
        RunState::Running => {
            if reachable(runtime, config).await {
                info!(gateway = %name, "gateway is running and reachable, no action");
                return;
            }
            info!(gateway = %name, "gateway is running but unreachable, restarting it");
            if let Err(e) = lifecycle::restart(runtime, name).await {
                warn!(gateway = %name, error = %e, "gateway restart failed");
                return;
            }
            lifecycle::wait_until_running(
                runtime,
                name,
                config.start_wait(),
                config.poll_interval(),
            )
            .await;
            diagnostics::report_external_identity(runtime, name, &config.lookup_url).await;
        }
    }
}

/// Both probes must succeed; an exec failure on either counts as
/// unreachable (the container may be up while its tunnel is down).
async fn reachable(runtime: &dyn RuntimeClient, config: &RecoveryConfig) -> bool {
    let name = config.gateway.as_str();
    for target in [config.check_ip.as_str(), config.check_host.as_str()] {
        match runtime
            .exec(name, &["ping", "-c", "1", "-W", "5", target])
            .await
        {
            Ok(_) => info!(gateway = %name, %target, "reachability probe succeeded"),
            Err(e) => {
                warn!(gateway = %name, %target, error = %e, "reachability probe failed");
                return false;
            }
        }
    }
    true
}
