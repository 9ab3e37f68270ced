//! CLI parse: clap types for preinit. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// preinit - start a runtime context from a pre-initialized snapshot or from scratch
#[derive(Parser)]
#[command(name = "preinit", version)]
#[command(about = "Start a runtime context from a pre-initialized snapshot or from scratch")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (for config/preinit.toml)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the context and run a probe program (`-e 'p Boot.was_preinitialized?'`)
    Run {
        /// Snapshot artifact (defaults to config, then the embedded image)
        #[arg(long)]
        snapshot: Option<PathBuf>,
        /// Also write lifecycle events as JSON lines to this file
        #[arg(long)]
        events: Option<PathBuf>,
        /// Runtime options: -X<key>=<value>, --disable-<feature>, -e <program>
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Report whether the snapshot would be reused for the given runtime options
    Check {
        /// Snapshot artifact (defaults to config, then the embedded image)
        #[arg(long)]
        snapshot: Option<PathBuf>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
        /// Runtime options
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Show snapshot metadata
    Inspect {
        /// Snapshot artifact (defaults to config, then the embedded image)
        #[arg(long)]
        snapshot: Option<PathBuf>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

impl Commands {
    /// Runtime options passed after the subcommand.
    pub fn runtime_args(&self) -> &[String] {
        match self {
            Commands::Run { args, .. } | Commands::Check { args, .. } => args,
            Commands::Inspect { .. } => &[],
        }
    }
}
