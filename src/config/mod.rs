//! Configuration module for ki-cef-settings.
//!
//! This module provides the plain value form of the engine settings and the
//! layered loading that produces it:
//! - Loading settings from files (TOML/JSON)
//! - Environment variable overrides (`KI_CEF_*`)
//! - CLI argument overrides
//! - Opt-in validation
//!
//! # Example
//!
//! ```rust,no_run
//! use ki_cef_settings::config::StartupConfig;
//!
//! let config = StartupConfig::from_file("startup.toml").unwrap().merge_with_env();
//! let settings = config.into_settings();
//! ```

mod settings;

pub use settings::{
    default_subprocess_path, parse_color, CliArgs, ConfigError, SettingsRecord, StartupConfig,
    ENV_PREFIX, SUBPROCESS_EXECUTABLE,
};
