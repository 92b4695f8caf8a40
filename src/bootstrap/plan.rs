//! Everything the engine receives at startup, assembled from a settings holder.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::bootstrap::LaunchCommandLine;
use crate::config::SettingsRecord;
use crate::settings::{CustomScheme, InitSettings};

/// Snapshot of the settings, scheme list and launch command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapPlan {
    /// Values read from the native record.
    pub settings: SettingsRecord,
    /// Schemes in registration order, names already lower-cased.
    pub schemes: Vec<CustomScheme>,
    /// Browser process command line.
    pub command_line: LaunchCommandLine,
}

impl BootstrapPlan {
    /// Reads `settings` without disposing it.
    ///
    /// The command line starts from `process_args` (program first) unless
    /// `command_line_args_disabled` is set, in which case only the program
    /// name is kept. Switch overrides are applied on top either way.
    pub fn read<I, S>(settings: &InitSettings, process_args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let record = settings.snapshot();
        let schemes = settings.custom_schemes().to_vec();
        let overrides = settings.command_line_args();

        let parsed = LaunchCommandLine::from_args(process_args);
        let mut command_line = if record.command_line_args_disabled {
            debug!("host command line ignored, command_line_args_disabled is set");
            LaunchCommandLine::from_args(parsed.program())
        } else {
            parsed
        };
        command_line.apply_overrides(overrides);

        info!(
            schemes = schemes.len(),
            switches = command_line.switches().len(),
            overrides = overrides.len(),
            "bootstrap plan assembled"
        );

        Self {
            settings: record,
            schemes,
            command_line,
        }
    }

    /// Reads `settings` once and disposes it.
    pub fn assemble<I, S>(mut settings: InitSettings, process_args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let plan = Self::read(&settings, process_args);
        settings.dispose();
        plan
    }

    /// Plan without any host process arguments.
    pub fn from_settings(settings: InitSettings) -> Self {
        Self::assemble(settings, std::iter::empty::<String>())
    }
}
