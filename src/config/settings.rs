//! Plain settings record and layered configuration loading.
//!
//! [`SettingsRecord`] is the value form of the native initialization record.
//! [`StartupConfig`] adds the scheme list and switch overrides and knows how to
//! load itself from files, the environment and CLI arguments.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use crate::settings::{
    color_get_a, CommandLineArgs, CustomScheme, InitSettings, LogItems, LogSeverity,
};

/// File name of the helper executable launched for renderer, GPU and utility processes.
#[cfg(windows)]
pub const SUBPROCESS_EXECUTABLE: &str = "ki-cef-subprocess.exe";
/// File name of the helper executable launched for renderer, GPU and utility processes.
#[cfg(not(windows))]
pub const SUBPROCESS_EXECUTABLE: &str = "ki-cef-subprocess";

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "KI_CEF_";

/// Errors that can occur during configuration loading or validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or write a configuration file.
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML configuration.
    #[error("Failed to parse TOML configuration: {0}")]
    TomlParseError(#[from] toml::de::Error),

    /// Failed to serialize TOML configuration.
    #[error("Failed to serialize TOML configuration: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    /// Failed to parse or serialize JSON configuration.
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// Unsupported file format.
    #[error("Unsupported configuration file format: {0}")]
    UnsupportedFormat(String),
}

/// Resolves the subprocess executable that sits next to the running binary.
///
/// Falls back to the bare file name when the current executable cannot be located.
pub fn default_subprocess_path() -> PathBuf {
    match env::current_exe() {
        Ok(exe) => exe
            .parent()
            .map(|dir| dir.join(SUBPROCESS_EXECUTABLE))
            .unwrap_or_else(|| PathBuf::from(SUBPROCESS_EXECUTABLE)),
        Err(e) => {
            warn!("Could not resolve current executable: {}", e);
            PathBuf::from(SUBPROCESS_EXECUTABLE)
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_browser_subprocess_path() -> String {
    default_subprocess_path().to_string_lossy().into_owned()
}

/// Value form of the engine initialization record.
///
/// Every field mirrors one field of the native record. Empty strings mean
/// "engine default". Nothing here is range-checked on assignment; see
/// [`SettingsRecord::validate`] for the opt-in checks.
///
/// # Example
///
/// ```rust
/// use ki_cef_settings::config::SettingsRecord;
/// use ki_cef_settings::settings::LogSeverity;
///
/// let record = SettingsRecord::default()
///     .with_locale("de")
///     .with_log_severity(LogSeverity::Warning)
///     .with_remote_debugging_port(9222);
/// assert!(record.multi_threaded_message_loop);
/// assert!(record.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsRecord {
    /// Ignore standard Chromium command-line switches of the host process.
    #[serde(default)]
    pub command_line_args_disabled: bool,

    /// Drive message pump scheduling from the host application.
    #[serde(default)]
    pub external_message_pump: bool,

    /// Run the browser message loop on its own thread.
    #[serde(default = "default_true")]
    pub multi_threaded_message_loop: bool,

    /// Enable off-screen rendering support.
    #[serde(default)]
    pub windowless_rendering_enabled: bool,

    /// Persist session cookies (those without an expiry) across restarts.
    #[serde(default)]
    pub persist_session_cookies: bool,

    /// Drop the default cookieable schemes (http, https, ws, wss).
    #[serde(default)]
    pub cookieable_schemes_exclude_defaults: bool,

    /// Disable the sandbox.
    #[serde(default = "default_true")]
    pub no_sandbox: bool,

    /// Leave the host's POSIX signal handlers alone. Ignored where the
    /// engine has no such setting (Windows, Android).
    #[serde(default)]
    pub disable_signal_handlers: bool,

    /// Executable launched for sub-processes.
    #[serde(default = "default_browser_subprocess_path")]
    pub browser_subprocess_path: String,

    /// macOS framework directory. Empty means the default location.
    #[serde(default)]
    pub framework_dir_path: String,

    /// macOS main app bundle. Empty means the default location.
    #[serde(default)]
    pub main_bundle_path: String,

    /// Global browser cache directory. Empty means incognito.
    #[serde(default)]
    pub cache_path: String,

    /// Root directory for installation and profile data.
    #[serde(default)]
    pub root_cache_path: String,

    /// Locale passed to Blink, e.g. `en-US`.
    #[serde(default)]
    pub locale: String,

    /// Directory containing the locale `.pak` files.
    #[serde(default)]
    pub locales_dir_path: String,

    /// Directory containing `resources.pak` and friends.
    #[serde(default)]
    pub resources_dir_path: String,

    /// Debug log file.
    #[serde(default)]
    pub log_file: String,

    /// Minimum severity written to the log file.
    #[serde(default)]
    pub log_severity: LogSeverity,

    /// Decorations on each log line.
    #[serde(default)]
    pub log_items: LogItems,

    /// Custom V8 flags.
    #[serde(default)]
    pub javascript_flags: String,

    /// Product portion of the default User-Agent.
    #[serde(default)]
    pub user_agent_product: String,

    /// Full User-Agent override.
    #[serde(default)]
    pub user_agent: String,

    /// Comma-separated `Accept-Language` list.
    #[serde(default)]
    pub accept_language_list: String,

    /// Comma-separated extra cookieable schemes.
    #[serde(default)]
    pub cookieable_schemes_list: String,

    /// Remote debugging port, 0 to disable.
    #[serde(default)]
    pub remote_debugging_port: i32,

    /// Stack frames captured for uncaught exceptions, 0 to disable.
    #[serde(default)]
    pub uncaught_exception_stack_size: i32,

    /// Background color as 0xAARRGGBB.
    #[serde(default)]
    pub background_color: u32,

    /// Policy id for the Chrome runtime's managed policies.
    #[serde(default)]
    pub chrome_policy_id: String,

    /// Windows resource id of the application icon.
    #[serde(default)]
    pub chrome_app_icon_id: i32,
}

impl Default for SettingsRecord {
    fn default() -> Self {
        Self {
            command_line_args_disabled: false,
            external_message_pump: false,
            multi_threaded_message_loop: default_true(),
            windowless_rendering_enabled: false,
            persist_session_cookies: false,
            cookieable_schemes_exclude_defaults: false,
            no_sandbox: default_true(),
            disable_signal_handlers: false,
            browser_subprocess_path: default_browser_subprocess_path(),
            framework_dir_path: String::new(),
            main_bundle_path: String::new(),
            cache_path: String::new(),
            root_cache_path: String::new(),
            locale: String::new(),
            locales_dir_path: String::new(),
            resources_dir_path: String::new(),
            log_file: String::new(),
            log_severity: LogSeverity::Default,
            log_items: LogItems::DEFAULT,
            javascript_flags: String::new(),
            user_agent_product: String::new(),
            user_agent: String::new(),
            accept_language_list: String::new(),
            cookieable_schemes_list: String::new(),
            remote_debugging_port: 0,
            uncaught_exception_stack_size: 0,
            background_color: 0,
            chrome_policy_id: String::new(),
            chrome_app_icon_id: 0,
        }
    }
}

impl SettingsRecord {
    /// Creates a record with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks the values against the engine's documented ranges.
    ///
    /// Nothing in the crate calls this implicitly: the engine is the authority
    /// on what it accepts, and the accessors pass values through unchanged.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let port = self.remote_debugging_port;
        if port != 0 && !(1024..=65535).contains(&port) {
            return Err(ConfigError::ValidationError(format!(
                "Remote debugging port must be 0 or between 1024 and 65535, got {}",
                port
            )));
        }

        if self.uncaught_exception_stack_size < 0 {
            return Err(ConfigError::ValidationError(format!(
                "Uncaught exception stack size cannot be negative, got {}",
                self.uncaught_exception_stack_size
            )));
        }

        let alpha = color_get_a(self.background_color);
        if alpha != 0x00 && alpha != 0xFF {
            return Err(ConfigError::ValidationError(format!(
                "Background color alpha must be 0x00 or 0xFF, got {:#04X}",
                alpha
            )));
        }

        for (name, value) in self.path_fields() {
            if !value.is_empty() && !Path::new(value).is_absolute() {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be an absolute path: {}",
                    name, value
                )));
            }
        }

        if !self.cache_path.is_empty()
            && !self.root_cache_path.is_empty()
            && !Path::new(&self.cache_path).starts_with(&self.root_cache_path)
        {
            return Err(ConfigError::ValidationError(format!(
                "cache_path {} must be equal to or a child of root_cache_path {}",
                self.cache_path, self.root_cache_path
            )));
        }

        Ok(())
    }

    fn path_fields(&self) -> [(&'static str, &str); 8] {
        [
            ("browser_subprocess_path", &self.browser_subprocess_path),
            ("framework_dir_path", &self.framework_dir_path),
            ("main_bundle_path", &self.main_bundle_path),
            ("cache_path", &self.cache_path),
            ("root_cache_path", &self.root_cache_path),
            ("locales_dir_path", &self.locales_dir_path),
            ("resources_dir_path", &self.resources_dir_path),
            ("log_file", &self.log_file),
        ]
    }

    /// Applies `KI_CEF_*` environment variable overrides.
    ///
    /// Unparseable numeric values are ignored with a warning.
    pub fn apply_env_overrides(&mut self) {
        let flags: [(&str, &mut bool); 8] = [
            ("COMMAND_LINE_ARGS_DISABLED", &mut self.command_line_args_disabled),
            ("EXTERNAL_MESSAGE_PUMP", &mut self.external_message_pump),
            ("MULTI_THREADED_MESSAGE_LOOP", &mut self.multi_threaded_message_loop),
            ("WINDOWLESS_RENDERING_ENABLED", &mut self.windowless_rendering_enabled),
            ("PERSIST_SESSION_COOKIES", &mut self.persist_session_cookies),
            (
                "COOKIEABLE_SCHEMES_EXCLUDE_DEFAULTS",
                &mut self.cookieable_schemes_exclude_defaults,
            ),
            ("NO_SANDBOX", &mut self.no_sandbox),
            ("DISABLE_SIGNAL_HANDLERS", &mut self.disable_signal_handlers),
        ];
        for (name, field) in flags {
            if let Some(val) = env_var(name) {
                *field = val.to_lowercase() == "true" || val == "1";
            }
        }

        let strings: [(&str, &mut String); 15] = [
            ("BROWSER_SUBPROCESS_PATH", &mut self.browser_subprocess_path),
            ("FRAMEWORK_DIR_PATH", &mut self.framework_dir_path),
            ("MAIN_BUNDLE_PATH", &mut self.main_bundle_path),
            ("CACHE_PATH", &mut self.cache_path),
            ("ROOT_CACHE_PATH", &mut self.root_cache_path),
            ("LOCALE", &mut self.locale),
            ("LOCALES_DIR_PATH", &mut self.locales_dir_path),
            ("RESOURCES_DIR_PATH", &mut self.resources_dir_path),
            ("LOG_FILE", &mut self.log_file),
            ("JAVASCRIPT_FLAGS", &mut self.javascript_flags),
            ("USER_AGENT_PRODUCT", &mut self.user_agent_product),
            ("USER_AGENT", &mut self.user_agent),
            ("ACCEPT_LANGUAGE_LIST", &mut self.accept_language_list),
            ("COOKIEABLE_SCHEMES_LIST", &mut self.cookieable_schemes_list),
            ("CHROME_POLICY_ID", &mut self.chrome_policy_id),
        ];
        for (name, field) in strings {
            if let Some(val) = env_var(name) {
                *field = val;
            }
        }

        if let Some(val) = env_var("LOG_SEVERITY") {
            match val.parse() {
                Ok(severity) => self.log_severity = severity,
                Err(e) => warn!("Ignoring {}LOG_SEVERITY: {}", ENV_PREFIX, e),
            }
        }

        let numbers: [(&str, &mut i32); 4] = [
            ("REMOTE_DEBUGGING_PORT", &mut self.remote_debugging_port),
            (
                "UNCAUGHT_EXCEPTION_STACK_SIZE",
                &mut self.uncaught_exception_stack_size,
            ),
            ("CHROME_APP_ICON_ID", &mut self.chrome_app_icon_id),
            ("LOG_ITEMS", &mut self.log_items.0),
        ];
        for (name, field) in numbers {
            if let Some(val) = env_var(name) {
                match val.parse() {
                    Ok(n) => *field = n,
                    Err(_) => warn!("Ignoring {}{}: not an integer: {}", ENV_PREFIX, name, val),
                }
            }
        }

        if let Some(val) = env_var("BACKGROUND_COLOR") {
            match parse_color(&val) {
                Some(color) => self.background_color = color,
                None => warn!("Ignoring {}BACKGROUND_COLOR: not a color: {}", ENV_PREFIX, val),
            }
        }
    }

    /// Returns the record with environment overrides applied.
    pub fn merge_with_env(mut self) -> Self {
        self.apply_env_overrides();
        self
    }

    // Builder-style methods for convenient configuration

    /// Sets the sub-process executable path.
    pub fn with_browser_subprocess_path(mut self, path: impl Into<String>) -> Self {
        self.browser_subprocess_path = path.into();
        self
    }

    /// Sets the cache path.
    pub fn with_cache_path(mut self, path: impl Into<String>) -> Self {
        self.cache_path = path.into();
        self
    }

    /// Sets the root cache path.
    pub fn with_root_cache_path(mut self, path: impl Into<String>) -> Self {
        self.root_cache_path = path.into();
        self
    }

    /// Sets the locale.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Sets the User-Agent override.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the log file and severity.
    pub fn with_log_file(mut self, path: impl Into<String>) -> Self {
        self.log_file = path.into();
        self
    }

    /// Sets the log severity.
    pub fn with_log_severity(mut self, severity: LogSeverity) -> Self {
        self.log_severity = severity;
        self
    }

    /// Sets the remote debugging port.
    pub fn with_remote_debugging_port(mut self, port: i32) -> Self {
        self.remote_debugging_port = port;
        self
    }

    /// Enables or disables windowless rendering.
    pub fn with_windowless_rendering(mut self, enabled: bool) -> Self {
        self.windowless_rendering_enabled = enabled;
        self
    }

    /// Sets the message loop mode.
    pub fn with_multi_threaded_message_loop(mut self, enabled: bool) -> Self {
        self.multi_threaded_message_loop = enabled;
        self
    }

    /// Sets the background color.
    pub fn with_background_color(mut self, color: u32) -> Self {
        self.background_color = color;
        self
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(format!("{}{}", ENV_PREFIX, name)).ok()
}

/// Parses `0xAARRGGBB`, `#AARRGGBB` or a decimal integer.
pub fn parse_color(value: &str) -> Option<u32> {
    let value = value.trim();
    let hex = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .or_else(|| value.strip_prefix('#'));
    match hex {
        Some(digits) => u32::from_str_radix(digits, 16).ok(),
        None => value.parse().ok(),
    }
}

/// Everything needed to build an [`InitSettings`]: the record, the scheme
/// list and the switch overrides.
///
/// In TOML the record fields sit at the top level:
///
/// ```toml
/// cache_path = "/var/lib/app/cache"
/// log_severity = "warning"
///
/// [[schemes]]
/// scheme_name = "app"
/// options = { standard = true, secure = true }
///
/// [command_line_args]
/// disable-gpu = ""
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartupConfig {
    /// Native record values.
    #[serde(flatten)]
    pub settings: SettingsRecord,

    /// Custom schemes, in registration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schemes: Vec<CustomScheme>,

    /// Command-line switch overrides.
    #[serde(default, skip_serializing_if = "CommandLineArgs::is_empty")]
    pub command_line_args: CommandLineArgs,
}

impl StartupConfig {
    pub fn new(settings: SettingsRecord) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    /// Loads a configuration file. TOML or JSON, chosen by extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        match file_extension(path).as_str() {
            "toml" => Ok(toml::from_str(&content)?),
            "json" => Ok(serde_json::from_str(&content)?),
            ext => Err(ConfigError::UnsupportedFormat(ext.to_string())),
        }
    }

    /// Saves the configuration. The format is chosen by extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = match file_extension(path).as_str() {
            "toml" => toml::to_string_pretty(self)?,
            "json" => serde_json::to_string_pretty(self)?,
            ext => return Err(ConfigError::UnsupportedFormat(ext.to_string())),
        };

        fs::write(path, content)?;
        Ok(())
    }

    /// Returns the configuration with environment overrides applied to the record.
    pub fn merge_with_env(mut self) -> Self {
        self.settings.apply_env_overrides();
        self
    }

    /// Applies CLI overrides. Schemes and switches from `args` are appended.
    pub fn merge_with_args(mut self, args: &CliArgs) -> Self {
        let settings = &mut self.settings;
        if let Some(ref path) = args.browser_subprocess_path {
            settings.browser_subprocess_path = path.clone();
        }
        if let Some(ref path) = args.cache_path {
            settings.cache_path = path.clone();
        }
        if let Some(ref path) = args.root_cache_path {
            settings.root_cache_path = path.clone();
        }
        if let Some(ref locale) = args.locale {
            settings.locale = locale.clone();
        }
        if let Some(ref user_agent) = args.user_agent {
            settings.user_agent = user_agent.clone();
        }
        if let Some(ref log_file) = args.log_file {
            settings.log_file = log_file.clone();
        }
        if let Some(severity) = args.log_severity {
            settings.log_severity = severity;
        }
        if let Some(port) = args.remote_debugging_port {
            settings.remote_debugging_port = port;
        }
        if let Some(color) = args.background_color {
            settings.background_color = color;
        }
        if let Some(windowless) = args.windowless_rendering_enabled {
            settings.windowless_rendering_enabled = windowless;
        }
        if let Some(multi_threaded) = args.multi_threaded_message_loop {
            settings.multi_threaded_message_loop = multi_threaded;
        }
        if let Some(disabled) = args.command_line_args_disabled {
            settings.command_line_args_disabled = disabled;
        }

        self.schemes
            .extend(args.schemes.iter().map(|name| CustomScheme::new(name.as_str())));
        self.command_line_args.extend(
            args.command_line_args
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        );

        self
    }

    /// Builds a live settings holder, registering every scheme so names are normalized.
    pub fn into_settings(self) -> InitSettings {
        let mut settings = InitSettings::from_record(&self.settings);
        for scheme in self.schemes {
            settings.register_scheme(scheme);
        }
        settings
            .command_line_args_mut()
            .extend(self.command_line_args.iter());
        settings
    }
}

fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// CLI overrides. All fields are optional to allow partial overrides.
#[derive(Debug, Default, Clone)]
pub struct CliArgs {
    /// Configuration file path.
    pub config_file: Option<PathBuf>,
    /// Sub-process executable.
    pub browser_subprocess_path: Option<String>,
    /// Cache directory.
    pub cache_path: Option<String>,
    /// Root cache directory.
    pub root_cache_path: Option<String>,
    /// Locale.
    pub locale: Option<String>,
    /// User-Agent override.
    pub user_agent: Option<String>,
    /// Log file.
    pub log_file: Option<String>,
    /// Log severity.
    pub log_severity: Option<LogSeverity>,
    /// Remote debugging port.
    pub remote_debugging_port: Option<i32>,
    /// Background color.
    pub background_color: Option<u32>,
    /// Windowless rendering.
    pub windowless_rendering_enabled: Option<bool>,
    /// Multi-threaded message loop.
    pub multi_threaded_message_loop: Option<bool>,
    /// Ignore host process switches.
    pub command_line_args_disabled: Option<bool>,
    /// Extra schemes to register.
    pub schemes: Vec<String>,
    /// Extra switch overrides.
    pub command_line_args: Vec<(String, String)>,
    /// Run [`SettingsRecord::validate`] on the merged result.
    pub strict: bool,
}

impl CliArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the final configuration by applying the full precedence chain:
    /// defaults, configuration file, environment, then these arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded, or if `strict` is set
    /// and validation fails.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use ki_cef_settings::config::CliArgs;
    ///
    /// let args = CliArgs {
    ///     config_file: Some("startup.toml".into()),
    ///     locale: Some("de".into()),
    ///     ..Default::default()
    /// };
    ///
    /// let config = args.load_config().unwrap();
    /// ```
    pub fn load_config(&self) -> Result<StartupConfig, ConfigError> {
        let config = if let Some(ref config_file) = self.config_file {
            StartupConfig::from_file(config_file)?
        } else {
            StartupConfig::default()
        };

        let config = config.merge_with_env().merge_with_args(self);

        if self.strict {
            config.settings.validate()?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record() {
        let record = SettingsRecord::default();
        assert!(record.multi_threaded_message_loop);
        assert!(record.no_sandbox);
        assert!(!record.windowless_rendering_enabled);
        assert!(record.browser_subprocess_path.ends_with(SUBPROCESS_EXECUTABLE));
        assert_eq!(record.log_severity, LogSeverity::Default);
        assert_eq!(record.remote_debugging_port, 0);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let record = SettingsRecord::default()
            .with_cache_path("/tmp/app/cache")
            .with_root_cache_path("/tmp/app")
            .with_locale("fr")
            .with_user_agent("TestAgent/1.0")
            .with_remote_debugging_port(9222)
            .with_windowless_rendering(true)
            .with_background_color(0xFFFF_FFFF);

        assert_eq!(record.cache_path, "/tmp/app/cache");
        assert_eq!(record.locale, "fr");
        assert_eq!(record.user_agent, "TestAgent/1.0");
        assert_eq!(record.remote_debugging_port, 9222);
        assert!(record.windowless_rendering_enabled);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_validation_port_range() {
        let record = SettingsRecord::default().with_remote_debugging_port(80);
        assert!(record.validate().is_err());
        let record = SettingsRecord::default().with_remote_debugging_port(65535);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_validation_partial_alpha() {
        let record = SettingsRecord::default().with_background_color(0x80FF_0000);
        assert!(record.validate().is_err());
        let record = SettingsRecord::default().with_background_color(0x0000_0000);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_validation_negative_stack_size() {
        let mut record = SettingsRecord::default();
        record.uncaught_exception_stack_size = -1;
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_validation_relative_path() {
        let record = SettingsRecord::default().with_cache_path("relative/cache");
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_validation_cache_outside_root() {
        let record = SettingsRecord::default()
            .with_root_cache_path("/srv/app")
            .with_cache_path("/srv/other");
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("0xFF102030"), Some(0xFF10_2030));
        assert_eq!(parse_color("#80ffffff"), Some(0x80FF_FFFF));
        assert_eq!(parse_color("255"), Some(255));
        assert_eq!(parse_color("red"), None);
    }

    #[test]
    fn test_cli_args_merge() {
        let args = CliArgs {
            locale: Some("ja".to_string()),
            remote_debugging_port: Some(9000),
            schemes: vec!["App".to_string()],
            command_line_args: vec![("disable-gpu".to_string(), String::new())],
            ..Default::default()
        };

        let config = StartupConfig::default().merge_with_args(&args);

        assert_eq!(config.settings.locale, "ja");
        assert_eq!(config.settings.remote_debugging_port, 9000);
        assert_eq!(config.settings.cache_path, ""); // Unchanged
        assert_eq!(config.schemes.len(), 1);
        assert!(config.command_line_args.contains("disable-gpu"));
    }

    #[test]
    fn test_toml_serialization() {
        let mut config = StartupConfig::new(
            SettingsRecord::default()
                .with_locale("de")
                .with_log_severity(LogSeverity::Error),
        );
        config.schemes.push(CustomScheme::new("app"));
        config.command_line_args.insert("lang", "de");

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: StartupConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_json_serialization() {
        let config = StartupConfig::new(SettingsRecord::default().with_background_color(0xFF00_00FF));
        let json_str = serde_json::to_string_pretty(&config).unwrap();
        let parsed: StartupConfig = serde_json::from_str(&json_str).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let parsed: StartupConfig = toml::from_str("locale = \"it\"").unwrap();
        assert_eq!(parsed.settings.locale, "it");
        assert!(parsed.settings.multi_threaded_message_loop);
        assert!(parsed.schemes.is_empty());
    }
}
