//! Configuration System
//!
//! Launcher settings loaded from TOML files and environment overrides: where
//! the snapshot artifact lives, runtime options applied before the command
//! line, and logging.

use crate::logging::LoggingConfig;
use crate::options::LaunchOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LauncherConfig {
    /// Snapshot location
    #[serde(default)]
    pub snapshot: SnapshotConfig,

    /// Default runtime options
    #[serde(default)]
    pub launch: LaunchDefaults,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Snapshot artifact to load; the embedded image is used when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LaunchDefaults {
    /// Runtime options applied before the command line (e.g. "-Xsync.stdio=true")
    #[serde(default)]
    pub options: Vec<String>,
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Snapshot(String),
    Launch(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Snapshot(msg) => write!(f, "Snapshot: {}", msg),
            ValidationError::Launch(msg) => write!(f, "Launch: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl LauncherConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Some(path) = &self.snapshot.path {
            if path.as_os_str().is_empty() {
                errors.push(ValidationError::Snapshot(
                    "Snapshot path cannot be empty".to_string(),
                ));
            }
        }

        if let Err(e) = LaunchOptions::parse(&self.launch.options) {
            errors.push(ValidationError::Launch(e.to_string()));
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            errors.push(ValidationError::Logging(format!(
                "Invalid format '{}'",
                self.logging.format
            )));
        }
        if !matches!(self.logging.output.as_str(), "stdout" | "stderr" | "file") {
            errors.push(ValidationError::Logging(format!(
                "Invalid output '{}'",
                self.logging.output
            )));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
