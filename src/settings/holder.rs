//! The initialization settings holder.
//!
//! [`InitSettings`] owns the native record for its whole life and exposes each
//! field through a getter/setter pair. Setters store exactly what they are
//! given; range checks live in [`SettingsRecord::validate`] and are opt-in.

use tracing::debug;

use crate::config::{default_subprocess_path, SettingsRecord};
use crate::native::record::{from_c_bool, to_c_bool};
use crate::native::{NativeSettingsHandle, NativeSettingsRecord};
use crate::settings::{CommandLineArgs, CustomScheme, LogItems, LogSeverity, SchemeRegistry};

const DISPOSED_MESSAGE: &str = "InitSettings accessed after dispose()";

macro_rules! flag_accessors {
    ($($(#[$doc:meta])* $field:ident / $setter:ident;)*) => {
        $(
            $(#[$doc])*
            pub fn $field(&self) -> bool {
                from_c_bool(self.record().$field)
            }

            pub fn $setter(&mut self, value: bool) {
                self.record_mut().$field = to_c_bool(value);
            }
        )*
    };
}

macro_rules! string_accessors {
    ($($(#[$doc:meta])* $field:ident / $setter:ident;)*) => {
        $(
            $(#[$doc])*
            pub fn $field(&self) -> String {
                self.record().$field.decode()
            }

            pub fn $setter(&mut self, value: &str) {
                self.record_mut().$field.assign(value);
            }
        )*
    };
}

/// Engine initialization settings.
///
/// Construct it, set what you need, register schemes and switches, then hand
/// it to the bootstrap. The holder has two states: live and disposed. Every
/// accessor on a disposed holder panics.
///
/// # Example
///
/// ```rust
/// use ki_cef_settings::settings::{CustomScheme, InitSettings, LogSeverity};
///
/// let mut settings = InitSettings::new();
/// settings.set_cache_path("/var/lib/app/cache");
/// settings.set_log_severity(LogSeverity::Warning);
/// settings.register_scheme(CustomScheme::new("App"));
///
/// assert!(settings.multi_threaded_message_loop());
/// assert_eq!(settings.custom_schemes()[0].scheme_name, "app");
///
/// assert!(settings.dispose());
/// assert!(!settings.dispose());
/// ```
#[derive(Debug)]
pub struct InitSettings {
    native: NativeSettingsHandle,
    schemes: SchemeRegistry,
    command_line_args: CommandLineArgs,
}

impl Default for InitSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl InitSettings {
    /// Allocates the native record with the startup defaults: multi-threaded
    /// message loop on, sandbox off and the sibling subprocess executable.
    pub fn new() -> Self {
        let mut record = NativeSettingsRecord::default();
        record.multi_threaded_message_loop = to_c_bool(true);
        record.no_sandbox = to_c_bool(true);
        record
            .browser_subprocess_path
            .assign(&default_subprocess_path().to_string_lossy());

        Self {
            native: NativeSettingsHandle::allocate(record),
            schemes: SchemeRegistry::new(),
            command_line_args: CommandLineArgs::new(),
        }
    }

    /// Creates a holder whose native record is encoded from `record`.
    pub fn from_record(record: &SettingsRecord) -> Self {
        Self {
            native: NativeSettingsHandle::allocate(NativeSettingsRecord::from_record(record)),
            schemes: SchemeRegistry::new(),
            command_line_args: CommandLineArgs::new(),
        }
    }

    #[track_caller]
    fn record(&self) -> &NativeSettingsRecord {
        match self.native.get() {
            Some(record) => record,
            None => panic!("{}", DISPOSED_MESSAGE),
        }
    }

    #[track_caller]
    fn record_mut(&mut self) -> &mut NativeSettingsRecord {
        match self.native.get_mut() {
            Some(record) => record,
            None => panic!("{}", DISPOSED_MESSAGE),
        }
    }

    #[track_caller]
    fn assert_live(&self) {
        assert!(!self.native.is_released(), "{}", DISPOSED_MESSAGE);
    }

    flag_accessors! {
        /// Start from an empty command line instead of the host process switches.
        command_line_args_disabled / set_command_line_args_disabled;
        /// Host schedules message pump work.
        external_message_pump / set_external_message_pump;
        /// Run the browser message loop on a separate thread.
        multi_threaded_message_loop / set_multi_threaded_message_loop;
        /// Off-screen rendering support.
        windowless_rendering_enabled / set_windowless_rendering_enabled;
        /// Persist session cookies.
        persist_session_cookies / set_persist_session_cookies;
        /// Exclude http, https, ws and wss from the cookieable schemes.
        cookieable_schemes_exclude_defaults / set_cookieable_schemes_exclude_defaults;
        /// Sandbox disabled.
        no_sandbox / set_no_sandbox;
    }

    string_accessors! {
        /// Executable used for sub-processes.
        browser_subprocess_path / set_browser_subprocess_path;
        /// macOS framework directory.
        framework_dir_path / set_framework_dir_path;
        /// macOS main app bundle.
        main_bundle_path / set_main_bundle_path;
        /// Global cache directory; empty for incognito.
        cache_path / set_cache_path;
        /// Root of installation and profile data.
        root_cache_path / set_root_cache_path;
        /// Locale passed to Blink.
        locale / set_locale;
        /// Directory of the locale packs.
        locales_dir_path / set_locales_dir_path;
        /// Directory of the resource packs.
        resources_dir_path / set_resources_dir_path;
        /// Debug log file.
        log_file / set_log_file;
        /// V8 flags.
        javascript_flags / set_javascript_flags;
        /// Product part of the default User-Agent.
        user_agent_product / set_user_agent_product;
        /// User-Agent override.
        user_agent / set_user_agent;
        /// `Accept-Language` list.
        accept_language_list / set_accept_language_list;
        /// Extra cookieable schemes.
        cookieable_schemes_list / set_cookieable_schemes_list;
        /// Chrome policy id.
        chrome_policy_id / set_chrome_policy_id;
    }

    /// Remote debugging port, 0 when disabled.
    pub fn remote_debugging_port(&self) -> i32 {
        self.record().remote_debugging_port
    }

    /// Stored as given; the engine ignores values outside 1024-65535.
    pub fn set_remote_debugging_port(&mut self, port: i32) {
        self.record_mut().remote_debugging_port = port;
    }

    pub fn uncaught_exception_stack_size(&self) -> i32 {
        self.record().uncaught_exception_stack_size
    }

    pub fn set_uncaught_exception_stack_size(&mut self, frames: i32) {
        self.record_mut().uncaught_exception_stack_size = frames;
    }

    /// Background color as 0xAARRGGBB.
    pub fn background_color(&self) -> u32 {
        self.record().background_color
    }

    /// Partial alpha is accepted here and left for the engine to judge.
    pub fn set_background_color(&mut self, color: u32) {
        self.record_mut().background_color = color;
    }

    pub fn log_items(&self) -> LogItems {
        LogItems(self.record().log_items)
    }

    pub fn set_log_items(&mut self, items: LogItems) {
        self.record_mut().log_items = items.bits();
    }

    pub fn chrome_app_icon_id(&self) -> i32 {
        self.record().chrome_app_icon_id
    }

    pub fn set_chrome_app_icon_id(&mut self, id: i32) {
        self.record_mut().chrome_app_icon_id = id;
    }

    /// Always `false` where the engine has no such setting.
    pub fn disable_signal_handlers(&self) -> bool {
        #[cfg(all(unix, not(target_os = "android")))]
        return from_c_bool(self.record().disable_signal_handlers);

        #[cfg(not(all(unix, not(target_os = "android"))))]
        {
            self.assert_live();
            false
        }
    }

    /// Ignored where the engine has no such setting.
    pub fn set_disable_signal_handlers(&mut self, value: bool) {
        #[cfg(all(unix, not(target_os = "android")))]
        {
            self.record_mut().disable_signal_handlers = to_c_bool(value);
        }

        #[cfg(not(all(unix, not(target_os = "android"))))]
        {
            self.assert_live();
            debug!(value, "disable_signal_handlers is not available on this platform");
        }
    }

    pub fn log_severity(&self) -> LogSeverity {
        LogSeverity::from_raw(self.record().log_severity).unwrap_or_default()
    }

    pub fn set_log_severity(&mut self, severity: LogSeverity) {
        self.record_mut().log_severity = severity.as_raw();
    }

    /// Registers a custom scheme. The stored name is lower-cased.
    pub fn register_scheme(&mut self, scheme: CustomScheme) -> &CustomScheme {
        self.assert_live();
        self.schemes.register(scheme)
    }

    /// Registered schemes in registration order.
    pub fn custom_schemes(&self) -> &[CustomScheme] {
        self.assert_live();
        self.schemes.as_slice()
    }

    /// Switch overrides applied to the engine command line.
    pub fn command_line_args(&self) -> &CommandLineArgs {
        self.assert_live();
        &self.command_line_args
    }

    pub fn command_line_args_mut(&mut self) -> &mut CommandLineArgs {
        self.assert_live();
        &mut self.command_line_args
    }

    /// Decodes the whole native record.
    pub fn snapshot(&self) -> SettingsRecord {
        self.record().to_record()
    }

    /// Overwrites every native field from `record`. Collections are untouched.
    pub fn apply(&mut self, record: &SettingsRecord) {
        *self.record_mut() = NativeSettingsRecord::from_record(record);
    }

    /// The native record as the engine will read it.
    pub fn native_record(&self) -> &NativeSettingsRecord {
        self.record()
    }

    /// The native record as a `cef_settings_t*`; null after dispose.
    pub fn as_native_ptr(&self) -> *const NativeSettingsRecord {
        self.native.as_ptr()
    }

    pub fn is_disposed(&self) -> bool {
        self.native.is_released()
    }

    /// Releases the native record.
    ///
    /// Returns `true` on the call that released it and `false` on any later call.
    pub fn dispose(&mut self) -> bool {
        let released = self.native.release();
        if released {
            debug!(
                schemes = self.schemes.len(),
                command_line_args = self.command_line_args.len(),
                "init settings disposed"
            );
        }
        released
    }
}
