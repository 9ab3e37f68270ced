//! preinit CLI Binary
//!
//! Starts a runtime context, reusing the pre-initialized snapshot when the
//! requested options allow it.

use clap::Parser;
use preinit::cli::{Cli, RunContext};
use preinit::config::ConfigLoader;
use preinit::environment::EnvironmentSnapshot;
use preinit::logging::{init_logging, runtime_level_to_filter, LoggingConfig};
use preinit::options::LaunchOptions;
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    let logging_config = build_logging_config(&cli);

    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("preinit: failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("preinit starting");

    let context = match RunContext::new(cli.workspace.clone(), cli.config.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error loading configuration: {}", e);
            eprintln!("{}", preinit::cli::map_error(&e));
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", preinit::cli::map_error(&e));
            process::exit(1);
        }
    }
}

/// Runtime log level requested with `-Xlog=<level>` in the configured launch
/// options, on the command line or in `PREINIT_OPTS`, in the order the run
/// applies them. Malformed options are ignored here and reported by the
/// command itself.
fn runtime_log_level(launch_options: &[String], cli: &Cli) -> Option<&'static str> {
    let mut options =
        LaunchOptions::parse(launch_options.iter().chain(cli.command.runtime_args())).ok()?;
    let _ = options.extend_from_env(&EnvironmentSnapshot::capture());
    options.log_level().and_then(runtime_level_to_filter)
}

/// Build logging configuration from CLI args, runtime options, and config file.
/// Precedence: --log-level, then --verbose, then -Xlog, then config file, then defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let loaded = if let Some(ref config_path) = cli.config {
        ConfigLoader::load_from_file(config_path).ok()
    } else {
        ConfigLoader::load(&cli.workspace).ok()
    };
    let (mut config, launch_options) = match loaded {
        Some(launcher) => (launcher.logging, launcher.launch.options),
        None => (LoggingConfig::default(), Vec::new()),
    };

    if let Some(level) = runtime_log_level(&launch_options, cli) {
        config.level = level.to_string();
    }
    if cli.quiet {
        config.enabled = false;
    }
    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }

    if config.enabled && config.output == "file" {
        let resolved =
            preinit::logging::resolve_log_file_path(cli.log_file.clone(), config.file.clone());
        if let Ok(path) = resolved {
            config.file = Some(path);
        }
    } else if let Some(ref file) = cli.log_file {
        config.file = Some(file.clone());
    }

    config
}
