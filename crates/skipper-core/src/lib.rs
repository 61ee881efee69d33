//! Core engine for Skipper: plan loading, executor configuration, and
//! plan execution against an agent CLI.
//!
//! This crate is UI-free. The dashboard in `skipper-cli` drives it
//! through the [`exec::Engine`] trait and renders what the callbacks
//! report.

pub mod config;
pub mod exec;
pub mod paths;
pub mod plan;

pub use config::{ConfigError, ExecConfig, DEFAULT_MAX_ATTEMPTS};
pub use exec::{
    output_channel, CliEngine, Engine, ExecError, ExecutorEvents, OutputReader, OutputWriter,
    ScriptStep, ScriptedEngine, BOUNDARY_MARKER, TOOL_MARKER,
};
pub use plan::{Plan, PlanError, PlanTask};
