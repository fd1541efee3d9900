//! Per-container lifecycle primitives.
//!
//! Thin, name-keyed wrappers over the runtime client plus the bounded
//! wait/verify poll used after every start or restart. A wait timeout is
//! a normal, logged outcome — the container may still become ready later
//! and will be caught by a subsequent probe or sweep.

use std::time::Duration;

use tracing::{info, warn};
use vpnguard_runtime::{RunState, RuntimeClient, RuntimeResult};

/// Outcome of a bounded wait for a container to reach Running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Ready,
    TimedOut,
}

/// Current run state of a container, `Unknown` when inspection fails.
pub async fn run_state(runtime: &dyn RuntimeClient, name: &str) -> RunState {
    match runtime.inspect(name).await {
        Ok(inspect) if inspect.exists => inspect.state,
        Ok(_) => RunState::Unknown,
        Err(e) => {
            warn!(%name, error = %e, "inspect failed");
            RunState::Unknown
        }
    }
}

pub async fn start(runtime: &dyn RuntimeClient, name: &str) -> RuntimeResult<()> {
    info!(%name, "starting container");
    runtime.start(name).await
}

pub async fn restart(runtime: &dyn RuntimeClient, name: &str) -> RuntimeResult<()> {
    info!(%name, "restarting container");
    runtime.restart(name).await
}

/// Poll the run state at `poll_interval` until the container reports
/// Running or `max_wait` elapses. Returns `TimedOut` without raising;
/// the caller decides what happens next.
pub async fn wait_until_running(
    runtime: &dyn RuntimeClient,
    name: &str,
    max_wait: Duration,
    poll_interval: Duration,
) -> WaitOutcome {
    let deadline = tokio::time::Instant::now() + max_wait;
    loop {
        if run_state(runtime, name).await == RunState::Running {
            info!(%name, "container is running");
            return WaitOutcome::Ready;
        }
        if tokio::time::Instant::now() + poll_interval > deadline {
            warn!(%name, max_wait = ?max_wait, "container did not reach running in time");
            return WaitOutcome::TimedOut;
        }
        tokio::time::sleep(poll_interval).await;
    }
}
