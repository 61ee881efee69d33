//! Execution errors.

use thiserror::Error;

/// Infrastructure failures while running a plan.
///
/// Task-level failures are not errors; they are reported through the
/// progress callbacks so the dashboard can show them. An `ExecError`
/// means the run itself could not proceed.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("no agent command configured; set one in config.toml or pass --command")]
    MissingCommand,

    #[error("failed to spawn agent command '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
