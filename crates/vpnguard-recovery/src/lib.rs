//! vpnguard-recovery — the recovery core for the VPN gateway controller.
//!
//! One invocation drives one probe / diagnose / repair / verify cycle,
//! bounded by a retry budget:
//!
//! ```text
//! Orchestrator
//!   ├── probe::check_endpoint() → HealthStatus
//!   ├── gateway::recover_gateway()
//!   │   ├── lifecycle::run_state / start / restart / wait_until_running
//!   │   └── diagnostics::report_external_identity()
//!   ├── dependents::recover_dependents()
//!   │   ├── discovery::discover_members()   (fresh label query, never cached)
//!   │   └── lifecycle primitives + secondary sweep
//!   └── stabilization sleep → re-probe → retry or abort
//! ```
//!
//! # Identity resilience
//!
//! Containers may be recreated with new runtime IDs mid-recovery (the
//! runtime's own restart policy acts outside this controller). The core
//! therefore keys everything by name and re-resolves the dependent set by
//! label on every pass.
//!
//! # Termination
//!
//! The loop terminates: either the endpoint comes back Up or the attempt
//! counter reaches the configured maximum. There is no unbounded retry
//! path, and all waiting is bounded polling.

pub mod config;
pub mod dependents;
pub mod diagnostics;
pub mod discovery;
pub mod gateway;
pub mod lifecycle;
pub mod orchestrator;
pub mod probe;

#[cfg(test)]
pub(crate) mod testutil;

pub use config::RecoveryConfig;
pub use orchestrator::{Orchestrator, RecoveryOutcome};
pub use probe::{HealthStatus, HttpProber, ProbeOutcome, Prober};
