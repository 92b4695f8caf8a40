//! KI CEF Settings - Main Entry Point
//!
//! Loads startup settings from file, environment and CLI, builds the settings
//! holder and hands it to the engine bootstrap. Without the `cef-browser`
//! feature the bootstrap is recorded and the resulting plan is printed.

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ki_cef_settings::{
    bootstrap::{BootstrapPlan, EngineBootstrap, EngineRuntime},
    config::{parse_color, CliArgs, StartupConfig},
    settings::{InitSettings, LogSeverity},
    NAME, VERSION,
};

/// ANSI color codes for terminal output
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
}

/// Output format for the printed plan
#[cfg_attr(feature = "cef-browser", allow(dead_code))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Toml,
}

/// Build the CLI command parser
fn build_cli() -> Command {
    Command::new(NAME)
        .version(VERSION)
        .author("KI-Browser Team")
        .about("Builds and inspects CEF initialization settings")
        .long_about(
            "Resolves CEF startup settings from a configuration file, KI_CEF_* \
             environment variables and command-line options, then bootstraps \
             the engine with them. Arguments after `--` are passed to the \
             browser process command line.",
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to configuration file (TOML or JSON)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("subprocess")
                .long("subprocess")
                .value_name("PATH")
                .help("Browser sub-process executable"),
        )
        .arg(
            Arg::new("cache-path")
                .long("cache-path")
                .value_name("PATH")
                .help("Cache directory for this browser context"),
        )
        .arg(
            Arg::new("root-cache-path")
                .long("root-cache-path")
                .value_name("PATH")
                .help("Root directory for all cache directories"),
        )
        .arg(
            Arg::new("locale")
                .long("locale")
                .value_name("LOCALE")
                .help("Locale string, e.g. en-US"),
        )
        .arg(
            Arg::new("user-agent")
                .long("user-agent")
                .value_name("STRING")
                .help("Custom user agent string"),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("PATH")
                .help("Engine debug log file"),
        )
        .arg(
            Arg::new("log-severity")
                .long("log-severity")
                .value_name("LEVEL")
                .help("Engine log severity: default, verbose, info, warning, error, fatal, disable"),
        )
        .arg(
            Arg::new("remote-debugging-port")
                .long("remote-debugging-port")
                .value_name("PORT")
                .help("DevTools remote debugging port (0 disables)")
                .value_parser(clap::value_parser!(i32)),
        )
        .arg(
            Arg::new("background-color")
                .long("background-color")
                .value_name("ARGB")
                .help("Background color as 0xAARRGGBB, #AARRGGBB or decimal"),
        )
        .arg(
            Arg::new("windowless")
                .long("windowless")
                .help("Enable windowless (off-screen) rendering")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("single-threaded-loop")
                .long("single-threaded-loop")
                .help("Run the browser message loop on the calling thread")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-host-args")
                .long("no-host-args")
                .help("Ignore the host process command line")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("scheme")
                .long("scheme")
                .value_name("NAME")
                .help("Register a custom scheme (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("arg")
                .long("arg")
                .value_name("NAME[=VALUE]")
                .help("Add a command-line switch override (repeatable)")
                .allow_hyphen_values(true)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .help("Validate the merged settings before bootstrapping")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .help("Plan output format")
                .value_parser(["json", "toml"])
                .default_value("json"),
        )
        .arg(
            Arg::new("save")
                .long("save")
                .value_name("FILE")
                .help("Write the merged configuration to FILE (TOML or JSON)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("show-native")
                .long("show-native")
                .help("Print the native settings record")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Suppress output except errors")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose"),
        )
        .arg(
            Arg::new("engine-args")
                .value_name("ENGINE_ARGS")
                .help("Browser process switches, after `--`")
                .num_args(0..)
                .last(true),
        )
}

/// Split `NAME[=VALUE]` into a switch override, stripping leading dashes.
fn parse_switch_override(raw: &str) -> Result<(String, String)> {
    let body = raw.trim_start_matches('-');
    let (name, value) = body.split_once('=').unwrap_or((body, ""));
    if name.is_empty() {
        anyhow::bail!("Switch override '{}' has no name", raw);
    }
    Ok((name.to_string(), value.to_string()))
}

/// Parse CLI arguments into CliArgs struct
fn parse_cli_args(matches: &clap::ArgMatches) -> Result<CliArgs> {
    let mut args = CliArgs::default();

    args.config_file = matches.get_one::<PathBuf>("config").cloned();
    args.browser_subprocess_path = matches.get_one::<String>("subprocess").cloned();
    args.cache_path = matches.get_one::<String>("cache-path").cloned();
    args.root_cache_path = matches.get_one::<String>("root-cache-path").cloned();
    args.locale = matches.get_one::<String>("locale").cloned();
    args.user_agent = matches.get_one::<String>("user-agent").cloned();
    args.log_file = matches.get_one::<String>("log-file").cloned();
    args.remote_debugging_port = matches.get_one::<i32>("remote-debugging-port").copied();
    args.strict = matches.get_flag("strict");

    if let Some(severity) = matches.get_one::<String>("log-severity") {
        let severity: LogSeverity = severity.parse().context("Invalid --log-severity")?;
        args.log_severity = Some(severity);
    }

    if let Some(color) = matches.get_one::<String>("background-color") {
        let color = parse_color(color)
            .with_context(|| format!("Invalid --background-color: {}", color))?;
        args.background_color = Some(color);
    }

    if matches.get_flag("windowless") {
        args.windowless_rendering_enabled = Some(true);
    }
    if matches.get_flag("single-threaded-loop") {
        args.multi_threaded_message_loop = Some(false);
    }
    if matches.get_flag("no-host-args") {
        args.command_line_args_disabled = Some(true);
    }

    if let Some(schemes) = matches.get_many::<String>("scheme") {
        args.schemes = schemes.cloned().collect();
    }
    if let Some(overrides) = matches.get_many::<String>("arg") {
        args.command_line_args = overrides
            .map(|raw| parse_switch_override(raw))
            .collect::<Result<_>>()?;
    }

    Ok(args)
}

/// Initialize the tracing/logging subsystem
fn init_tracing(verbosity: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Print a short summary of the resolved configuration
fn print_config_summary(config: &StartupConfig) {
    let settings = &config.settings;
    let or_unset = |value: &str| {
        if value.is_empty() {
            format!("{dim}(unset){reset}", dim = colors::DIM, reset = colors::RESET)
        } else {
            value.to_string()
        }
    };

    eprintln!(
        "{bold}{blue}Configuration:{reset}",
        bold = colors::BOLD,
        blue = colors::BLUE,
        reset = colors::RESET
    );
    eprintln!("  Subprocess:     {}", or_unset(&settings.browser_subprocess_path));
    eprintln!("  Root cache:     {}", or_unset(&settings.root_cache_path));
    eprintln!("  Cache:          {}", or_unset(&settings.cache_path));
    eprintln!("  Locale:         {}", or_unset(&settings.locale));
    eprintln!("  Log severity:   {}", settings.log_severity);
    eprintln!(
        "  Message loop:   {}",
        if settings.multi_threaded_message_loop {
            format!("{green}multi-threaded{reset}", green = colors::GREEN, reset = colors::RESET)
        } else {
            format!("{yellow}caller thread{reset}", yellow = colors::YELLOW, reset = colors::RESET)
        }
    );
    eprintln!("  Schemes:        {}", config.schemes.len());
    eprintln!("  Switches:       {}", config.command_line_args.len());
    eprintln!();
}

/// Render the plan in the requested format
#[cfg_attr(feature = "cef-browser", allow(dead_code))]
fn render_plan(plan: &BootstrapPlan, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(plan).context("Failed to serialize plan as JSON")
        }
        OutputFormat::Toml => {
            toml::to_string_pretty(plan).context("Failed to serialize plan as TOML")
        }
    }
}

/// Start `engine` with the settings and the host arguments
fn bootstrap<E: EngineBootstrap>(
    engine: E,
    settings: InitSettings,
    process_args: Vec<String>,
) -> Result<EngineRuntime<E>> {
    let mut runtime = EngineRuntime::new(engine);
    runtime.on_shutdown_started(|| debug!("shutdown started"));

    let started = runtime
        .initialize(settings, process_args)
        .context("Engine bootstrap failed")?;
    if !started {
        anyhow::bail!("Engine declined to initialize");
    }

    Ok(runtime)
}

fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    let verbosity = matches.get_count("verbose");
    let quiet = matches.get_flag("quiet");
    init_tracing(verbosity, quiet);

    let cli_args = parse_cli_args(&matches)?;

    let config = cli_args
        .load_config()
        .context("Failed to load configuration")?;

    if let Some(path) = matches.get_one::<PathBuf>("save") {
        config
            .to_file(path)
            .with_context(|| format!("Failed to save configuration to {}", path.display()))?;
        info!("Configuration saved to {}", path.display());
    }

    if !quiet {
        print_config_summary(&config);
    }

    let settings = config.into_settings();
    if matches.get_flag("show-native") {
        println!("{:#?}", settings.native_record());
    }

    let process_args: Vec<String> = std::iter::once(NAME.to_string())
        .chain(
            matches
                .get_many::<String>("engine-args")
                .into_iter()
                .flatten()
                .cloned(),
        )
        .collect();

    #[cfg(feature = "cef-browser")]
    {
        let mut runtime = bootstrap(
            ki_cef_settings::bootstrap::CefEngine::new(),
            settings,
            process_args,
        )?;
        info!("CEF running, shutting down");
        runtime.shutdown();
    }

    #[cfg(not(feature = "cef-browser"))]
    {
        let mut runtime = bootstrap(
            ki_cef_settings::bootstrap::RecordingEngine::new(),
            settings,
            process_args,
        )?;
        let format = match matches.get_one::<String>("format").map(String::as_str) {
            Some("toml") => OutputFormat::Toml,
            _ => OutputFormat::Json,
        };
        if let Some(plan) = runtime.engine().last_plan() {
            println!("{}", render_plan(plan, format)?);
        }
        runtime.shutdown();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ki_cef_settings::bootstrap::RecordingEngine;

    #[test]
    fn test_cli_parsing() {
        let cmd = build_cli();

        let matches = cmd
            .clone()
            .try_get_matches_from(["ki-cef-settings", "--windowless", "--strict"])
            .unwrap();

        assert!(matches.get_flag("windowless"));
        assert!(matches.get_flag("strict"));
    }

    #[test]
    fn test_cli_conflicts() {
        let cmd = build_cli();

        let result = cmd
            .clone()
            .try_get_matches_from(["ki-cef-settings", "-v", "--quiet"]);

        assert!(result.is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        let result = build_cli().try_get_matches_from(["ki-cef-settings", "--format", "yaml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_cli_args() {
        let matches = build_cli()
            .try_get_matches_from([
                "ki-cef-settings",
                "--locale",
                "de",
                "--remote-debugging-port",
                "9222",
                "--log-severity",
                "warn",
                "--background-color",
                "0xFF336699",
                "--single-threaded-loop",
                "--scheme",
                "App",
                "--scheme",
                "assets",
                "--arg",
                "disable-gpu",
                "--arg",
                "--lang=fr",
            ])
            .unwrap();

        let args = parse_cli_args(&matches).unwrap();

        assert_eq!(args.locale.as_deref(), Some("de"));
        assert_eq!(args.remote_debugging_port, Some(9222));
        assert_eq!(args.log_severity, Some(LogSeverity::Warning));
        assert_eq!(args.background_color, Some(0xFF33_6699));
        assert_eq!(args.multi_threaded_message_loop, Some(false));
        assert_eq!(args.windowless_rendering_enabled, None);
        assert_eq!(args.schemes, vec!["App", "assets"]);
        assert_eq!(
            args.command_line_args,
            vec![
                ("disable-gpu".to_string(), String::new()),
                ("lang".to_string(), "fr".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_cli_args_bad_color() {
        let matches = build_cli()
            .try_get_matches_from(["ki-cef-settings", "--background-color", "teal"])
            .unwrap();
        assert!(parse_cli_args(&matches).is_err());
    }

    #[test]
    fn test_parse_cli_args_nameless_switch() {
        for raw in ["--arg=--", "--arg==x", "--arg=-"] {
            let matches = build_cli()
                .try_get_matches_from(["ki-cef-settings", raw])
                .unwrap();
            let err = parse_cli_args(&matches).unwrap_err();
            assert!(err.to_string().contains("has no name"));
        }
    }

    #[test]
    fn test_engine_args_after_separator() {
        let matches = build_cli()
            .try_get_matches_from(["ki-cef-settings", "--", "--mute-audio", "index.html"])
            .unwrap();
        let engine_args: Vec<&String> = matches.get_many::<String>("engine-args").unwrap().collect();
        assert_eq!(engine_args, ["--mute-audio", "index.html"]);
    }

    #[test]
    fn test_bootstrap_and_render() {
        let mut settings = InitSettings::new();
        settings.command_line_args_mut().add_flag("disable-gpu");

        let runtime = bootstrap(
            RecordingEngine::new(),
            settings,
            vec!["ki-cef-settings".to_string(), "--mute-audio".to_string()],
        )
        .unwrap();
        let plan = runtime.engine().last_plan().unwrap();

        let json = render_plan(plan, OutputFormat::Json).unwrap();
        assert!(json.contains("disable-gpu"));
        assert!(json.contains("mute-audio"));

        let toml = render_plan(plan, OutputFormat::Toml).unwrap();
        assert!(toml.contains("multi_threaded_message_loop"));
    }

    #[test]
    fn test_bootstrap_refused() {
        let result = bootstrap(RecordingEngine::refusing(), InitSettings::new(), vec![]);
        assert!(result.is_err());
    }
}
