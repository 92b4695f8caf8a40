//! Native side of the settings: the `#[repr(C)]` record the engine reads and
//! the UTF-16 strings it contains.
//!
//! - [`string`] - Owned UTF-16 string field
//! - [`record`] - Initialization record and its owning handle

pub mod record;
pub mod string;

pub use record::{NativeSettingsHandle, NativeSettingsRecord};
pub use string::NativeString;
