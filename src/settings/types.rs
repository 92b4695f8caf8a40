//! Scalar value types shared by the settings record and the native layout.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::ConfigError;

/// Engine log severity.
///
/// Discriminants match `cef_log_severity_t`. Only messages of this severity or
/// higher are written to the engine log file.
///
/// Config files accept the same names as [`FromStr`], aliases included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
#[repr(i32)]
pub enum LogSeverity {
    /// Let the engine pick (currently `Info`).
    Default = 0,
    /// Verbose logging.
    Verbose = 1,
    /// Informational logging.
    Info = 2,
    /// Warnings and above.
    Warning = 3,
    /// Errors and above.
    Error = 4,
    /// Fatal messages only.
    Fatal = 5,
    /// Nothing is written to the log file. Fatal messages still go to stderr.
    Disable = 99,
}

impl Default for LogSeverity {
    fn default() -> Self {
        Self::Default
    }
}

impl LogSeverity {
    /// All severities in ascending order.
    pub const ALL: [LogSeverity; 7] = [
        LogSeverity::Default,
        LogSeverity::Verbose,
        LogSeverity::Info,
        LogSeverity::Warning,
        LogSeverity::Error,
        LogSeverity::Fatal,
        LogSeverity::Disable,
    ];

    /// Returns the native `cef_log_severity_t` value.
    pub fn as_raw(self) -> i32 {
        self as i32
    }

    /// Maps a native value back to a severity, or `None` if it is not one the engine defines.
    pub fn from_raw(raw: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_raw() == raw)
    }

    /// Name used by the `log-severity` command-line switch.
    pub fn as_switch_value(self) -> &'static str {
        match self {
            LogSeverity::Default => "default",
            LogSeverity::Verbose => "verbose",
            LogSeverity::Info => "info",
            LogSeverity::Warning => "warning",
            LogSeverity::Error => "error",
            LogSeverity::Fatal => "fatal",
            LogSeverity::Disable => "disable",
        }
    }
}

impl fmt::Display for LogSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_switch_value())
    }
}

impl FromStr for LogSeverity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" => Ok(LogSeverity::Default),
            "verbose" | "debug" => Ok(LogSeverity::Verbose),
            "info" => Ok(LogSeverity::Info),
            "warning" | "warn" => Ok(LogSeverity::Warning),
            "error" => Ok(LogSeverity::Error),
            "fatal" => Ok(LogSeverity::Fatal),
            "disable" | "off" => Ok(LogSeverity::Disable),
            _ => Err(ConfigError::ValidationError(format!(
                "Unknown log severity: {}. Valid values are: default, verbose, info, warning, error, fatal, disable",
                s
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for LogSeverity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Decorations on each engine log line, as a `cef_log_items_t` bitmask.
///
/// `0` lets the engine decide; [`LogItems::NONE`] disables all decorations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogItems(pub i32);

impl LogItems {
    pub const DEFAULT: LogItems = LogItems(0);
    pub const NONE: LogItems = LogItems(1);
    pub const FLAG_PROCESS_ID: LogItems = LogItems(1 << 1);
    pub const FLAG_THREAD_ID: LogItems = LogItems(1 << 2);
    pub const FLAG_TIME_STAMP: LogItems = LogItems(1 << 3);
    pub const FLAG_TICK_COUNT: LogItems = LogItems(1 << 4);

    pub fn bits(self) -> i32 {
        self.0
    }

    pub fn contains(self, other: LogItems) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for LogItems {
    type Output = LogItems;

    fn bitor(self, rhs: LogItems) -> LogItems {
        LogItems(self.0 | rhs.0)
    }
}

/// Combines four channels into a `cef_color_t` (0xAARRGGBB).
///
/// ```rust
/// use ki_cef_settings::settings::color_set_argb;
///
/// assert_eq!(color_set_argb(0xFF, 0x12, 0x34, 0x56), 0xFF12_3456);
/// ```
pub const fn color_set_argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Alpha channel of an ARGB color.
pub const fn color_get_a(color: u32) -> u8 {
    (color >> 24) as u8
}

/// Red channel of an ARGB color.
pub const fn color_get_r(color: u32) -> u8 {
    (color >> 16) as u8
}

/// Green channel of an ARGB color.
pub const fn color_get_g(color: u32) -> u8 {
    (color >> 8) as u8
}

/// Blue channel of an ARGB color.
pub const fn color_get_b(color: u32) -> u8 {
    color as u8
}
