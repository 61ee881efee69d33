//! Executor configuration.
//!
//! Loaded from `~/.skipper/config.toml` when present. Every field has a
//! default so a missing or partial file is fine; CLI flags override the
//! loaded values after the fact.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::paths;

/// Attempts per task before the plan is considered failed.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings for how plan tasks are executed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecConfig {
    /// Agent CLI spawned for each task attempt. Empty means unconfigured.
    pub command: String,

    /// Extra arguments passed to the agent CLI on every attempt.
    pub args: Vec<String>,

    /// Attempts per task before the plan fails.
    pub max_attempts: u32,

    /// Cost estimate rate in USD per million input tokens.
    pub input_cost_per_mtok: f64,

    /// Cost estimate rate in USD per million output tokens.
    pub output_cost_per_mtok: f64,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            command: String::new(),
            args: Vec::new(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            input_cost_per_mtok: 3.0,
            output_cost_per_mtok: 15.0,
        }
    }
}

impl ExecConfig {
    /// Load from the default location, falling back to defaults when the
    /// file does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&paths::config_file())
    }

    /// Load from an explicit path. A missing file yields the defaults; a
    /// present but malformed file is an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Estimated cost in USD for a single usage report.
    pub fn cost_for(&self, input_tokens: u64, output_tokens: u64) -> f64 {
        let input = input_tokens as f64 / 1_000_000.0 * self.input_cost_per_mtok;
        let output = output_tokens as f64 / 1_000_000.0 * self.output_cost_per_mtok;
        input + output
    }
}
