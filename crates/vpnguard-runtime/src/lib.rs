//! vpnguard-runtime — container runtime access for vpnguard.
//!
//! Exposes the [`RuntimeClient`] capability trait the recovery core is
//! written against (inspect, start, restart, exec, label query) and the
//! [`DockerCli`] implementation that drives the `docker` binary.
//!
//! The recovery core never holds a runtime identity (container ID): every
//! operation is keyed by name, and the dependent set is re-resolved by
//! label on each use. The runtime may recreate containers with new IDs
//! underneath us at any time.

pub mod client;
pub mod docker;
pub mod error;

pub use client::{ContainerInspect, RunState, RuntimeClient};
pub use docker::DockerCli;
pub use error::{RuntimeError, RuntimeResult};
