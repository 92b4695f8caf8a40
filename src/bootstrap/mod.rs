//! Engine bootstrap: turns a settings holder into what the engine consumes at
//! startup and tracks the engine lifecycle.
//!
//! # Submodules
//!
//! - [`command_line`] - Browser process launch command line
//! - [`plan`] - Snapshot of settings, schemes and command line
//! - [`engine`] - Bootstrap trait, recording engine and lifecycle runtime
//! - [`cef_engine`] - CEF binding (requires `cef-browser` feature)

pub mod command_line;
pub mod engine;
pub mod plan;

/// CEF binding (requires `cef-browser` feature).
#[cfg(feature = "cef-browser")]
pub mod cef_engine;

pub use command_line::{LaunchCommandLine, Switch, MERGED_SWITCHES};
pub use engine::{BootstrapError, EngineBootstrap, EngineRuntime, RecordingEngine};
pub use plan::BootstrapPlan;

#[cfg(feature = "cef-browser")]
pub use cef_engine::{to_cef_settings, CefEngine};
