//! Scripted fakes for the runtime client and prober.
//!
//! `FakeRuntime` keeps a per-name run state, answers label queries from a
//! settable list, and records every issued command so tests can assert on
//! the exact command sequence. `FakePlan` replays a scripted sequence of
//! probe outcomes.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use vpnguard_runtime::{ContainerInspect, RunState, RuntimeClient, RuntimeError, RuntimeResult};

use crate::probe::{ProbeOutcome, Prober};

#[derive(Default)]
pub struct FakeRuntime {
    states: Mutex<HashMap<String, RunState>>,
    labeled: Mutex<Vec<String>>,
    calls: Mutex<Vec<String>>,
    fail_lifecycle: Mutex<HashSet<String>>,
    fail_exec_containing: Mutex<HashSet<String>>,
    exec_response: Mutex<String>,
    running_after_polls: Mutex<HashMap<String, u32>>,
}

impl FakeRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_state(&self, name: &str, state: RunState) {
        self.states.lock().unwrap().insert(name.to_string(), state);
    }

    pub fn set_labeled(&self, names: &[&str]) {
        *self.labeled.lock().unwrap() = names.iter().map(|n| n.to_string()).collect();
    }

    /// Make start/restart against this name fail with a command error.
    pub fn fail_lifecycle_on(&self, name: &str) {
        self.fail_lifecycle.lock().unwrap().insert(name.to_string());
    }

    /// Make exec fail whenever any argv element equals this token.
    pub fn fail_exec_containing(&self, token: &str) {
        self.fail_exec_containing
            .lock()
            .unwrap()
            .insert(token.to_string());
    }

    pub fn set_exec_response(&self, body: &str) {
        *self.exec_response.lock().unwrap() = body.to_string();
    }

    /// Report Stopped for the next `polls` inspects, then Running.
    pub fn set_running_after_polls(&self, name: &str, polls: u32) {
        self.running_after_polls
            .lock()
            .unwrap()
            .insert(name.to_string(), polls);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Only the commands that mutate container state.
    pub fn lifecycle_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with("start ") || c.starts_with("restart "))
            .collect()
    }

    pub fn inspect_count(&self, name: &str) -> usize {
        let needle = format!("inspect {name}");
        self.calls().iter().filter(|c| **c == needle).count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl RuntimeClient for FakeRuntime {
    async fn inspect(&self, name: &str) -> RuntimeResult<ContainerInspect> {
        self.record(format!("inspect {name}"));

        let mut pending = self.running_after_polls.lock().unwrap();
        if let Some(remaining) = pending.get_mut(name) {
            if *remaining > 0 {
                *remaining -= 1;
                return Ok(ContainerInspect {
                    exists: true,
                    state: RunState::Stopped,
                });
            }
            return Ok(ContainerInspect {
                exists: true,
                state: RunState::Running,
            });
        }
        drop(pending);

        match self.states.lock().unwrap().get(name) {
            Some(&state) => Ok(ContainerInspect {
                exists: true,
                state,
            }),
            None => Ok(ContainerInspect::absent()),
        }
    }

    async fn start(&self, name: &str) -> RuntimeResult<()> {
        self.record(format!("start {name}"));
        if self.fail_lifecycle.lock().unwrap().contains(name) {
            return Err(RuntimeError::Command {
                command: format!("docker start {name}"),
                stderr: "simulated failure".to_string(),
            });
        }
        self.set_state(name, RunState::Running);
        Ok(())
    }

    async fn restart(&self, name: &str) -> RuntimeResult<()> {
        self.record(format!("restart {name}"));
        if self.fail_lifecycle.lock().unwrap().contains(name) {
            return Err(RuntimeError::Command {
                command: format!("docker restart {name}"),
                stderr: "simulated failure".to_string(),
            });
        }
        self.set_state(name, RunState::Running);
        Ok(())
    }

    async fn exec(&self, name: &str, argv: &[&str]) -> RuntimeResult<String> {
        self.record(format!("exec {name} {}", argv.join(" ")));
        let failing = self.fail_exec_containing.lock().unwrap();
        if argv.iter().any(|a| failing.contains(*a)) {
            return Err(RuntimeError::Command {
                command: format!("docker exec {name} {}", argv.join(" ")),
                stderr: "simulated exec failure".to_string(),
            });
        }
        Ok(self.exec_response.lock().unwrap().clone())
    }

    async fn query_by_label(&self, key: &str, value: &str) -> RuntimeResult<Vec<String>> {
        self.record(format!("query {key}={value}"));
        Ok(self.labeled.lock().unwrap().clone())
    }
}

/// Prober replaying a scripted outcome sequence; the last outcome repeats
/// once the script is exhausted.
pub struct FakePlan {
    outcomes: Mutex<VecDeque<ProbeOutcome>>,
    last: Mutex<ProbeOutcome>,
    probes: Mutex<u32>,
}

impl FakePlan {
    pub fn new(codes: &[u16]) -> Self {
        let outcomes: VecDeque<ProbeOutcome> =
            codes.iter().map(|&c| ProbeOutcome::Status(c)).collect();
        let last = outcomes
            .back()
            .cloned()
            .unwrap_or(ProbeOutcome::TransportError("no script".to_string()));
        Self {
            outcomes: Mutex::new(outcomes),
            last: Mutex::new(last),
            probes: Mutex::new(0),
        }
    }

    pub fn probes(&self) -> u32 {
        *self.probes.lock().unwrap()
    }
}

#[async_trait]
impl Prober for FakePlan {
    async fn get(&self, _url: &str) -> ProbeOutcome {
        *self.probes.lock().unwrap() += 1;
        match self.outcomes.lock().unwrap().pop_front() {
            Some(outcome) => {
                *self.last.lock().unwrap() = outcome.clone();
                outcome
            }
            None => self.last.lock().unwrap().clone(),
        }
    }
}
