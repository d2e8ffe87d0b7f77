//! Sandbox preparation pipeline for Saltbox.
//!
//! This crate ties the schema and sandbox layers together into the six
//! preparation steps that materialize a hermetic Salt root: fixture data, the
//! minion configuration, the state top file, pillars, grains, and the formula or
//! state collection trees. Every step takes the configuration, the sandbox
//! layout, and a `PrepareLog` explicitly; nothing is read from ambient state.

pub mod collection;
pub mod log;
pub mod pipeline;
pub mod prepare;

pub use collection::{resolve_collection_name, CollectionName};
pub use log::{LogLevel, MemoryLog, PrepareLog, TracingLog};
pub use pipeline::{prepare_sandbox, run_step, PrepareReport, Step};
pub use prepare::{
    minion_config_content, prepare_data, prepare_dependencies, prepare_formula, prepare_grains,
    prepare_minion, prepare_pillars, prepare_state_collection, prepare_state_top, prepare_states,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Config(#[from] saltbox_schema::ConfigError),
    #[error("render error: {0}")]
    Render(#[from] saltbox_schema::RenderError),
    #[error("sandbox error: {0}")]
    Sandbox(#[from] saltbox_sandbox::SandboxError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unknown preparation step: {0}")]
    UnknownStep(String),
}
