//! Engine initialization settings.
//!
//! # Submodules
//!
//! - [`holder`] - The settings holder that owns the native record
//! - [`scheme`] - Custom scheme descriptors and the registration list
//! - [`command_line`] - Command-line switch overrides
//! - [`types`] - Log severity and color helpers

pub mod command_line;
pub mod holder;
pub mod scheme;
pub mod types;

pub use command_line::CommandLineArgs;
pub use holder::InitSettings;
pub use scheme::{CustomScheme, SchemeOptions, SchemeRegistry};
pub use types::{
    color_get_a, color_get_b, color_get_g, color_get_r, color_set_argb, LogItems, LogSeverity,
};
