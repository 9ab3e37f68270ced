//! CLI route: single route table and run context. Dispatches to the lifecycle
//! manager and presentation.

use crate::cli::help::command_name;
use crate::cli::parse::Commands;
use crate::cli::presentation::{format_check, format_inspect, InspectView};
use crate::compat::CompatibilityChecker;
use crate::config::{ConfigLoader, LauncherConfig};
use crate::environment::EnvironmentSnapshot;
use crate::error::StartupError;
use crate::lifecycle::ContextLifecycleManager;
use crate::context::ContextOrigin;
use crate::options::{describe_options, LaunchOptions, ResolvedOptions};
use crate::program::Program;
use crate::snapshot::{SnapshotArtifact, SnapshotImage};
use crate::telemetry::{JsonLinesSink, LifecycleEventSink, TracingSink};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Runtime context for CLI execution: workspace, loaded config, and the
/// environment captured at process start.
pub struct RunContext {
    workspace_root: PathBuf,
    config: LauncherConfig,
    environment: EnvironmentSnapshot,
    started: Instant,
}

/// Image to start from plus where it came from.
struct LoadedImage {
    image: SnapshotImage,
    source: String,
    checksum: Option<String>,
}

fn print_metric(id: &str, started: Instant) {
    let ms = started.elapsed().as_millis();
    eprintln!("{} {}.{:03}", id, ms / 1000, ms % 1000);
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, StartupError> {
        let started = Instant::now();
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        config.validate().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            StartupError::ConfigError(messages.join("; "))
        })?;

        Ok(Self {
            workspace_root,
            config,
            environment: EnvironmentSnapshot::capture(),
            started,
        })
    }

    /// Replace the captured environment. Used when launching on behalf of
    /// another process.
    pub fn with_environment(mut self, environment: EnvironmentSnapshot) -> Self {
        self.environment = environment;
        self
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, StartupError> {
        let started = Instant::now();
        let result = self.execute_inner(command);
        debug!(
            command = command_name(command),
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, StartupError> {
        match command {
            Commands::Run {
                snapshot,
                events,
                args,
            } => self.handle_run(snapshot.as_deref(), events.as_deref(), args),
            Commands::Check {
                snapshot,
                format,
                args,
            } => self.handle_check(snapshot.as_deref(), format, args),
            Commands::Inspect { snapshot, format } => {
                let loaded = self.load_image(snapshot.as_deref())?;
                let view = InspectView {
                    source: loaded.source,
                    metadata: loaded.image.metadata,
                    checksum: loaded.checksum,
                };
                Ok(format_inspect(&view, format))
            }
        }
    }

    /// Config defaults, then the command line, then `PREINIT_OPTS`.
    fn resolve_options(&self, args: &[String]) -> Result<ResolvedOptions, StartupError> {
        let mut options = LaunchOptions::parse(self.config.launch.options.iter().chain(args))?;
        options.extend_from_env(&self.environment)?;
        Ok(options.resolve(self.environment.clone())?)
    }

    /// `--snapshot`, then the configured path, then the embedded image.
    /// Relative configured paths are taken from the workspace root.
    fn load_image(&self, explicit: Option<&Path>) -> Result<LoadedImage, StartupError> {
        let path = match (explicit, self.config.snapshot.path.as_ref()) {
            (Some(path), _) => Some(path.to_path_buf()),
            (None, Some(path)) if path.is_relative() => Some(self.workspace_root.join(path)),
            (None, Some(path)) => Some(path.clone()),
            (None, None) => None,
        };
        match path {
            Some(path) => {
                let artifact = SnapshotArtifact::load(&path)?;
                Ok(LoadedImage {
                    checksum: Some(artifact.checksum_hex()),
                    image: artifact.image,
                    source: path.display().to_string(),
                })
            }
            None => Ok(LoadedImage {
                image: SnapshotImage::embedded(),
                source: "embedded".to_string(),
                checksum: None,
            }),
        }
    }

    fn handle_run(
        &self,
        snapshot: Option<&Path>,
        events: Option<&Path>,
        args: &[String],
    ) -> Result<String, StartupError> {
        let resolved = self.resolve_options(args)?;
        if resolved.print_options {
            return Ok(describe_options());
        }
        let program = resolved.program.as_deref().map(Program::parse).transpose()?;
        let loaded = self.load_image(snapshot)?;
        info!(source = %loaded.source, "Starting context");

        let sink: Box<dyn LifecycleEventSink> = match events {
            Some(path) => {
                let file = File::create(path)?;
                Box::new((TracingSink, JsonLinesSink::new(BufWriter::new(file))))
            }
            None => Box::new(TracingSink),
        };
        let mut manager = ContextLifecycleManager::new(sink);
        manager.start(&resolved.configuration, loaded.image)?;

        if resolved.metrics_time {
            print_metric("before-main", self.started);
        }
        let outcome = match (program, manager.live()) {
            (Some(program), Some(context)) => {
                if let ContextOrigin::Snapshot(meta) = context.origin() {
                    debug!(
                        polyglot_stdio = meta.built_with_polyglot_stdio,
                        sync_stdio = meta.built_with_sync_stdio,
                        "Running program in pre-initialized context"
                    );
                }
                program.run(context, io::stdout().lock()).map(|_| ())
            }
            _ => Ok(()),
        };
        if resolved.metrics_time {
            print_metric("after-main", self.started);
        }

        manager.shutdown()?;
        outcome.map(|_| String::new())
    }

    fn handle_check(
        &self,
        snapshot: Option<&Path>,
        format: &str,
        args: &[String],
    ) -> Result<String, StartupError> {
        let resolved = self.resolve_options(args)?;
        let loaded = self.load_image(snapshot)?;
        let result = CompatibilityChecker::new().check(&resolved.configuration, &loaded.image.metadata);
        Ok(format_check(&result, format))
    }
}
