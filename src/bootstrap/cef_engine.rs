//! CEF binding for the bootstrap (requires the `cef-browser` feature).
//!
//! Converts the holder's native record into `cef::Settings`, registers the
//! plan's schemes and switches through the application callbacks and starts
//! CEF with the plan's command line as its main arguments.

use std::ffi::CString;
use std::os::raw::c_char;

use cef::{App, AppCallbacks, CefString, LogSeverity as CefLogSeverity, Settings};
use tracing::{debug, info};

use crate::bootstrap::{BootstrapError, BootstrapPlan, EngineBootstrap, LaunchCommandLine, Switch};
use crate::native::NativeSettingsRecord;
use crate::settings::{CustomScheme, LogSeverity};

/// Builds `cef::Settings` from the native record, field for field.
pub fn to_cef_settings(native: &NativeSettingsRecord) -> Settings {
    Settings {
        no_sandbox: native.no_sandbox,
        browser_subprocess_path: native.browser_subprocess_path.decode().as_str().into(),
        framework_dir_path: native.framework_dir_path.decode().as_str().into(),
        main_bundle_path: native.main_bundle_path.decode().as_str().into(),
        multi_threaded_message_loop: native.multi_threaded_message_loop,
        external_message_pump: native.external_message_pump,
        windowless_rendering_enabled: native.windowless_rendering_enabled,
        command_line_args_disabled: native.command_line_args_disabled,
        cache_path: native.cache_path.decode().as_str().into(),
        root_cache_path: native.root_cache_path.decode().as_str().into(),
        persist_session_cookies: native.persist_session_cookies,
        user_agent: native.user_agent.decode().as_str().into(),
        user_agent_product: native.user_agent_product.decode().as_str().into(),
        locale: native.locale.decode().as_str().into(),
        log_file: native.log_file.decode().as_str().into(),
        log_severity: to_cef_log_severity(
            LogSeverity::from_raw(native.log_severity).unwrap_or_default(),
        ),
        log_items: cef::sys::cef_log_items_t(native.log_items as _).into(),
        javascript_flags: native.javascript_flags.decode().as_str().into(),
        resources_dir_path: native.resources_dir_path.decode().as_str().into(),
        locales_dir_path: native.locales_dir_path.decode().as_str().into(),
        remote_debugging_port: native.remote_debugging_port,
        uncaught_exception_stack_size: native.uncaught_exception_stack_size,
        background_color: native.background_color,
        accept_language_list: native.accept_language_list.decode().as_str().into(),
        cookieable_schemes_list: native.cookieable_schemes_list.decode().as_str().into(),
        cookieable_schemes_exclude_defaults: native.cookieable_schemes_exclude_defaults,
        chrome_policy_id: native.chrome_policy_id.decode().as_str().into(),
        chrome_app_icon_id: native.chrome_app_icon_id,
        #[cfg(all(unix, not(target_os = "android")))]
        disable_signal_handlers: native.disable_signal_handlers,
        ..Default::default()
    }
}

fn to_cef_log_severity(severity: LogSeverity) -> CefLogSeverity {
    match severity {
        LogSeverity::Default => CefLogSeverity::DEFAULT,
        LogSeverity::Verbose => CefLogSeverity::VERBOSE,
        LogSeverity::Info => CefLogSeverity::INFO,
        LogSeverity::Warning => CefLogSeverity::WARNING,
        LogSeverity::Error => CefLogSeverity::ERROR,
        LogSeverity::Fatal => CefLogSeverity::FATAL,
        LogSeverity::Disable => CefLogSeverity::DISABLE,
    }
}

/// `argc`/`argv` built from a launch command line. The strings live as long
/// as this value.
struct PlanArgs {
    _strings: Vec<CString>,
    argv: Vec<*mut c_char>,
}

impl PlanArgs {
    fn new(command_line: &LaunchCommandLine) -> Result<Self, BootstrapError> {
        let strings = command_line
            .to_args()
            .into_iter()
            .map(CString::new)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| BootstrapError::Engine(format!("invalid command line argument: {}", e)))?;
        let argv = strings.iter().map(|s| s.as_ptr() as *mut c_char).collect();
        Ok(Self {
            _strings: strings,
            argv,
        })
    }

    #[cfg(not(windows))]
    fn main_args(&mut self) -> cef::MainArgs {
        cef::MainArgs {
            argc: self.argv.len() as i32,
            argv: self.argv.as_mut_ptr(),
        }
    }
}

/// Application callbacks that replay the plan's switches and schemes.
struct PlanAppCallbacks {
    switches: Vec<Switch>,
    schemes: Vec<CustomScheme>,
}

impl AppCallbacks for PlanAppCallbacks {
    fn on_before_command_line_processing(
        &self,
        _process_type: &CefString,
        command_line: &mut cef::command_line::CommandLine,
    ) {
        for switch in &self.switches {
            command_line.append_switch(&switch.name, &switch.value);
        }
        debug!("CEF command line configured with {} switches", self.switches.len());
    }

    fn on_register_custom_schemes(&self, registrar: &mut cef::SchemeRegistrar) {
        for scheme in &self.schemes {
            registrar.add_custom_scheme(&CefString::new(&scheme.scheme_name), scheme.options.bits());
        }
    }
}

/// [`EngineBootstrap`] backed by the real CEF library.
#[derive(Default)]
pub struct CefEngine {
    running: bool,
}

impl CefEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EngineBootstrap for CefEngine {
    fn initialize(
        &mut self,
        plan: &BootstrapPlan,
        native: &NativeSettingsRecord,
    ) -> Result<bool, BootstrapError> {
        let settings = to_cef_settings(native);
        let mut app = App::new(PlanAppCallbacks {
            switches: plan.command_line.switches().to_vec(),
            schemes: plan.schemes.clone(),
        });
        #[cfg_attr(windows, allow(unused_mut))]
        let mut args = PlanArgs::new(&plan.command_line)?;
        debug!(argc = args.argv.len(), "CEF main arguments built from the plan");

        // Windows main args carry the module handle; CEF reads the command
        // line from the process there, and the plan's switches still arrive
        // through `on_before_command_line_processing`.
        #[cfg(windows)]
        let main_args = cef::args::Args::new();
        #[cfg(windows)]
        let main_args = main_args.as_main_args();
        #[cfg(not(windows))]
        let main_args = &args.main_args();

        let result = cef::initialize(
            Some(main_args),
            Some(&settings),
            Some(&mut app),
            std::ptr::null_mut(),
        );
        if result != 1 {
            return Err(BootstrapError::Engine(format!(
                "cef::initialize returned {}",
                result
            )));
        }

        info!("CEF initialized");
        self.running = true;
        Ok(true)
    }

    fn shutdown(&mut self) {
        if std::mem::take(&mut self.running) {
            info!("Shutting down CEF");
            cef::shutdown();
        }
    }
}
