//! Runtime client error types.

use thiserror::Error;

/// Result type alias for runtime client operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors that can occur while driving the container runtime.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to spawn runtime command: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("runtime command failed ({command}): {stderr}")]
    Command { command: String, stderr: String },
}
