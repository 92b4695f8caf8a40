//! Environment override tests
//!
//! Kept in their own test binary with a single test so the `KI_CEF_*`
//! variables cannot leak into other tests running in parallel.

use ki_cef_settings::config::{CliArgs, SettingsRecord};
use ki_cef_settings::settings::LogSeverity;
use std::env;

#[test]
fn test_env_overrides_and_precedence() {
    env::set_var("KI_CEF_LOCALE", "pt-BR");
    env::set_var("KI_CEF_WINDOWLESS_RENDERING_ENABLED", "1");
    env::set_var("KI_CEF_MULTI_THREADED_MESSAGE_LOOP", "false");
    env::set_var("KI_CEF_REMOTE_DEBUGGING_PORT", "9333");
    env::set_var("KI_CEF_LOG_SEVERITY", "error");
    env::set_var("KI_CEF_BACKGROUND_COLOR", "#FF000000");
    env::set_var("KI_CEF_UNCAUGHT_EXCEPTION_STACK_SIZE", "many");
    env::set_var("KI_CEF_LOG_ITEMS", "10");
    env::set_var("KI_CEF_CHROME_POLICY_ID", "com.example.app");

    let record = SettingsRecord::default().merge_with_env();
    assert_eq!(record.locale, "pt-BR");
    assert!(record.windowless_rendering_enabled);
    assert!(!record.multi_threaded_message_loop);
    assert_eq!(record.remote_debugging_port, 9333);
    assert_eq!(record.log_severity, LogSeverity::Error);
    assert_eq!(record.background_color, 0xFF00_0000);
    // Unparseable values keep the previous value.
    assert_eq!(record.uncaught_exception_stack_size, 0);
    assert_eq!(record.log_items.bits(), 10);
    assert_eq!(record.chrome_policy_id, "com.example.app");

    // CLI beats environment.
    let args = CliArgs {
        locale: Some("es".to_string()),
        ..Default::default()
    };
    let config = args.load_config().unwrap();
    assert_eq!(config.settings.locale, "es");
    assert_eq!(config.settings.remote_debugging_port, 9333);

    for name in [
        "KI_CEF_LOCALE",
        "KI_CEF_WINDOWLESS_RENDERING_ENABLED",
        "KI_CEF_MULTI_THREADED_MESSAGE_LOOP",
        "KI_CEF_REMOTE_DEBUGGING_PORT",
        "KI_CEF_LOG_SEVERITY",
        "KI_CEF_BACKGROUND_COLOR",
        "KI_CEF_UNCAUGHT_EXCEPTION_STACK_SIZE",
        "KI_CEF_LOG_ITEMS",
        "KI_CEF_CHROME_POLICY_ID",
    ] {
        env::remove_var(name);
    }
}
