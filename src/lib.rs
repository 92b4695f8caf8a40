//! # KI CEF Settings
//!
//! Initialization settings for embedding the Chromium Embedded Framework.
//!
//! The central type is [`InitSettings`]. It owns the fixed-layout native
//! record that the engine's startup routine reads, and it exposes every field
//! as a typed accessor. It also collects the custom URL schemes and
//! command-line switch overrides the engine needs at startup.
//!
//! ## Quick Start
//!
//! ```rust
//! use ki_cef_settings::{
//!     bootstrap::{EngineRuntime, RecordingEngine},
//!     settings::{CustomScheme, InitSettings, LogSeverity, SchemeOptions},
//! };
//!
//! let mut settings = InitSettings::new();
//! settings.set_root_cache_path("/var/lib/app");
//! settings.set_cache_path("/var/lib/app/default");
//! settings.set_log_severity(LogSeverity::Warning);
//! settings.register_scheme(
//!     CustomScheme::new("App").with_options(SchemeOptions { standard: true, ..Default::default() }),
//! );
//! settings.command_line_args_mut().add_flag("disable-gpu");
//!
//! let mut runtime = EngineRuntime::new(RecordingEngine::new());
//! runtime.initialize(settings, std::env::args()).unwrap();
//! runtime.shutdown();
//! ```
//!
//! ## Module Overview
//!
//! - [`settings`]: The settings holder, schemes, switch overrides, value types
//! - [`native`]: The `#[repr(C)]` record and its UTF-16 strings
//! - [`config`]: Plain settings record and layered file/env/CLI loading
//! - [`bootstrap`]: Startup plan assembly and engine lifecycle
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   from_record    ┌──────────────┐    read     ┌───────────────┐
//! │    config    │ ───────────────▶ │   settings   │ ──────────▶ │   bootstrap   │
//! │ SettingsRecord│ ◀─────────────── │ InitSettings │             │ BootstrapPlan │
//! └──────────────┘    snapshot      └──────┬───────┘             └───────┬───────┘
//!                                          │ owns                        │ EngineBootstrap
//!                                   ┌──────┴───────┐             ┌───────┴───────┐
//!                                   │    native    │             │  CEF / mock   │
//!                                   └──────────────┘             └───────────────┘
//! ```

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Full version string with name
pub const FULL_VERSION: &str = concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Module Exports
// ============================================================================

/// Settings holder, custom schemes and command-line overrides.
pub mod settings;

/// Native record layout and string marshalling.
pub mod native;

/// Configuration loading from files, env and CLI.
pub mod config;

/// Startup plan assembly and engine lifecycle.
pub mod bootstrap;

// ============================================================================
// Re-exports for Convenience
// ============================================================================

pub use settings::{
    color_set_argb, CommandLineArgs, CustomScheme, InitSettings, LogSeverity, SchemeOptions,
};

pub use native::{NativeSettingsHandle, NativeSettingsRecord, NativeString};

pub use config::{CliArgs, ConfigError, SettingsRecord, StartupConfig};

pub use bootstrap::{
    BootstrapError, BootstrapPlan, EngineBootstrap, EngineRuntime, LaunchCommandLine,
    RecordingEngine,
};

#[cfg(feature = "cef-browser")]
pub use bootstrap::CefEngine;

// ============================================================================
// Prelude Module
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```rust
/// use ki_cef_settings::prelude::*;
/// ```
pub mod prelude {
    pub use crate::bootstrap::{BootstrapPlan, EngineBootstrap, EngineRuntime};
    pub use crate::config::{SettingsRecord, StartupConfig};
    pub use crate::settings::{CustomScheme, InitSettings, LogSeverity, SchemeOptions};
    pub use crate::{FULL_VERSION, NAME, VERSION};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constants() {
        assert!(!VERSION.is_empty());
        assert!(!NAME.is_empty());
        assert!(FULL_VERSION.contains(VERSION));
        assert!(FULL_VERSION.contains(NAME));
    }

    #[test]
    fn test_prelude_imports() {
        use crate::prelude::*;
        let settings = InitSettings::new();
        let _ = BootstrapPlan::from_settings(settings);
        let _ = VERSION;
    }
}
