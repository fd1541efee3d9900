//! Recovery orchestrator — the top-level state machine.
//!
//! ```text
//! Probing ──Up──▶ Done(Up)
//!    │Down
//!    ▼
//! GatewayRecovery ─▶ DependentRecovery ─▶ AwaitStabilization ─▶ Reprobing
//!         ▲  (extra cycle on PartialFailure)        │Up──▶ Done(Up)
//!         └──────────────── retry ◀─────────────────┘Down, budget left
//!                                                    └─▶ Aborted(StillDown)
//! ```
//!
//! Attempt state (counter, last pass outcome) lives in run-loop locals
//! and is discarded when the invocation ends; nothing persists across
//! runs. A retried iteration does not re-probe at the top: recovery is
//! always attempted once more before the next probe.

use std::sync::Arc;

use tracing::{error, info, warn};
use vpnguard_runtime::RuntimeClient;

use crate::config::RecoveryConfig;
use crate::dependents::{self, PassOutcome};
use crate::diagnostics;
use crate::gateway;
use crate::probe::{self, HealthStatus, Prober};

/// Terminal outcome of one orchestrator invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryOutcome {
    /// The endpoint is Up. `attempts` is the number of recovery cycles
    /// that were run before it came back (0 when the first probe was Up).
    Resolved { attempts: u32 },
    /// The retry budget is exhausted and the endpoint is still Down.
    RetriesExhausted { attempts: u32 },
}

impl RecoveryOutcome {
    pub fn is_resolved(self) -> bool {
        matches!(self, RecoveryOutcome::Resolved { .. })
    }
}

/// Drives probe / diagnose / repair / verify cycles until the endpoint
/// is Up or the retry budget runs out.
pub struct Orchestrator {
    runtime: Arc<dyn RuntimeClient>,
    prober: Arc<dyn Prober>,
    config: RecoveryConfig,
}

impl Orchestrator {
    pub fn new(
        runtime: Arc<dyn RuntimeClient>,
        prober: Arc<dyn Prober>,
        config: RecoveryConfig,
    ) -> Self {
        Self {
            runtime,
            prober,
            config,
        }
    }

    /// Run one full invocation. Always terminates: either the endpoint
    /// comes back Up or the attempt counter reaches `max_retries`.
    pub async fn run(&self) -> RecoveryOutcome {
        let runtime = self.runtime.as_ref();
        let config = &self.config;

        if probe::check_endpoint(self.prober.as_ref(), &config.health_url).await
            == HealthStatus::Up
        {
            info!(url = %config.health_url, "endpoint is up, nothing to recover");
            diagnostics::report_external_identity(runtime, &config.gateway, &config.lookup_url)
                .await;
            return RecoveryOutcome::Resolved { attempts: 0 };
        }

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            info!(attempt, max_retries = config.max_retries, "endpoint is down, starting recovery cycle");

            self.recovery_cycle().await;

            info!(delay = %config.stabilization, "waiting for services to stabilize");
            tokio::time::sleep(config.stabilization()).await;

            if probe::check_endpoint(self.prober.as_ref(), &config.health_url).await
                == HealthStatus::Up
            {
                info!(attempt, "endpoint recovered");
                diagnostics::report_external_identity(
                    runtime,
                    &config.gateway,
                    &config.lookup_url,
                )
                .await;
                return RecoveryOutcome::Resolved { attempts: attempt };
            }

            if attempt >= config.max_retries {
                error!(
                    attempts = attempt,
                    "retry budget exhausted, endpoint still down"
                );
                return RecoveryOutcome::RetriesExhausted { attempts: attempt };
            }
            warn!(attempt, "endpoint still down after recovery cycle, retrying");
        }
    }

    /// One gateway + dependent recovery cycle. A partial dependent
    /// failure is treated as possible evidence the gateway itself needs
    /// another look, so it forces one extra full cycle.
    async fn recovery_cycle(&self) {
        let runtime = self.runtime.as_ref();

        gateway::recover_gateway(runtime, &self.config).await;
        if dependents::recover_dependents(runtime, &self.config).await
            == PassOutcome::PartialFailure
        {
            warn!("dependent pass ended in partial failure, re-running gateway and dependent recovery");
            gateway::recover_gateway(runtime, &self.config).await;
            dependents::recover_dependents(runtime, &self.config).await;
        }
    }
}
