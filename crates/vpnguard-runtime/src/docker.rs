//! Docker CLI implementation of the runtime client.
//!
//! Shells out to the `docker` binary rather than the engine API: the
//! controller runs on the same host as the daemon, and the CLI keeps the
//! dependency surface to a single well-known tool. Every issued command
//! and its outcome is logged so the invocation log is a complete causal
//! trace.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::client::{ContainerInspect, RunState, RuntimeClient};
use crate::error::{RuntimeError, RuntimeResult};

/// Runtime client backed by the docker (or compatible, e.g. podman) CLI.
#[derive(Debug, Clone)]
pub struct DockerCli {
    binary: String,
}

impl DockerCli {
    pub fn new() -> Self {
        Self {
            binary: "docker".to_string(),
        }
    }

    /// Use a different CLI binary (e.g. "podman").
    pub fn with_binary(binary: &str) -> Self {
        Self {
            binary: binary.to_string(),
        }
    }

    /// Run one CLI command, returning stdout on success.
    async fn run(&self, args: &[&str]) -> RuntimeResult<String> {
        let command = format!("{} {}", self.binary, args.join(" "));
        debug!(%command, "issuing runtime command");

        let output = Command::new(&self.binary).args(args).output().await?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if output.status.success() {
            debug!(%command, "runtime command succeeded");
            Ok(stdout)
        } else {
            warn!(%command, %stderr, "runtime command failed");
            Err(RuntimeError::Command { command, stderr })
        }
    }
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RuntimeClient for DockerCli {
    async fn inspect(&self, name: &str) -> RuntimeResult<ContainerInspect> {
        match self
            .run(&["inspect", "-f", "{{.State.Status}}", name])
            .await
        {
            Ok(stdout) => Ok(ContainerInspect {
                exists: true,
                state: parse_inspect_state(&stdout),
            }),
            // Inspect failure means the name does not resolve right now
            // (removed, or recreated under a different name).
            Err(RuntimeError::Command { .. }) => Ok(ContainerInspect::absent()),
            Err(e) => Err(e),
        }
    }

    async fn start(&self, name: &str) -> RuntimeResult<()> {
        self.run(&["start", name]).await.map(|_| ())
    }

    async fn restart(&self, name: &str) -> RuntimeResult<()> {
        self.run(&["restart", name]).await.map(|_| ())
    }

    async fn exec(&self, name: &str, argv: &[&str]) -> RuntimeResult<String> {
        let mut args = vec!["exec", name];
        args.extend_from_slice(argv);
        self.run(&args).await
    }

    async fn query_by_label(&self, key: &str, value: &str) -> RuntimeResult<Vec<String>> {
        let filter = format!("label={key}={value}");
        let stdout = self
            .run(&[
                "ps",
                "-a",
                "--filter",
                &filter,
                "--format",
                "{{.Names}}",
            ])
            .await?;
        Ok(parse_names(&stdout))
    }
}

/// Map docker's status string to a run state.
///
/// Docker reports one of created / running / paused / restarting /
/// removing / exited / dead; only "running" counts as Running here.
fn parse_inspect_state(stdout: &str) -> RunState {
    match stdout.trim() {
        "running" => RunState::Running,
        "" => RunState::Unknown,
        _ => RunState::Stopped,
    }
}

/// One container name per output line, empty lines dropped.
fn parse_names(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inspect_state_running() {
        assert_eq!(parse_inspect_state("running\n"), RunState::Running);
    }

    #[test]
    fn inspect_state_exited_is_stopped() {
        assert_eq!(parse_inspect_state("exited\n"), RunState::Stopped);
        assert_eq!(parse_inspect_state("created"), RunState::Stopped);
        assert_eq!(parse_inspect_state("restarting"), RunState::Stopped);
    }

    #[test]
    fn inspect_state_empty_is_unknown() {
        assert_eq!(parse_inspect_state("\n"), RunState::Unknown);
    }

    #[test]
    fn names_split_per_line() {
        let out = "svc-a\nsvc-b\n\nsvc-c\n";
        assert_eq!(parse_names(out), vec!["svc-a", "svc-b", "svc-c"]);
    }

    #[test]
    fn names_empty_output() {
        assert!(parse_names("").is_empty());
        assert!(parse_names("\n").is_empty());
    }
}
