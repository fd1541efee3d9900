//! The runtime client capability trait and container state types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RuntimeResult;

/// Observed run state of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Running,
    Stopped,
    /// Inspect failed — the name does not currently resolve to a container.
    Unknown,
}

impl RunState {
    /// Whether a start (rather than a restart) is the safe repair action.
    pub fn needs_start(self) -> bool {
        self != RunState::Running
    }
}

/// Result of inspecting a container by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerInspect {
    /// Whether the name resolved to a container at all.
    pub exists: bool,
    pub state: RunState,
}

impl ContainerInspect {
    /// Inspect result for a name that did not resolve.
    pub fn absent() -> Self {
        Self {
            exists: false,
            state: RunState::Unknown,
        }
    }
}

/// Capability interface to the container runtime.
///
/// All operations are keyed by container **name**. Implementations must
/// resolve the name freshly on every call — callers rely on this to
/// survive containers being recreated with new runtime IDs mid-recovery.
#[async_trait]
pub trait RuntimeClient: Send + Sync {
    /// Inspect a container's current run state.
    async fn inspect(&self, name: &str) -> RuntimeResult<ContainerInspect>;

    /// Start a stopped container.
    async fn start(&self, name: &str) -> RuntimeResult<()>;

    /// Restart a container (running or not).
    async fn restart(&self, name: &str) -> RuntimeResult<()>;

    /// Run a command inside a running container and return its stdout.
    async fn exec(&self, name: &str, argv: &[&str]) -> RuntimeResult<String>;

    /// Names of all containers (running or stopped) carrying the label.
    async fn query_by_label(&self, key: &str, value: &str) -> RuntimeResult<Vec<String>>;
}
