//! Configuration loading: layered sources merged into a `LauncherConfig`.

use crate::config::merge::merge_policy;
use crate::config::sources::{global_file, workspace_file};
use crate::config::LauncherConfig;
use config::{ConfigError, Environment, File};
use std::path::Path;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for `workspace_root`: defaults, global file,
    /// workspace files, then `PREINIT__SECTION__KEY` environment variables.
    /// `PREINIT__LAUNCH__OPTIONS` is split on spaces.
    pub fn load(workspace_root: &Path) -> Result<LauncherConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        builder
            .add_source(
                Environment::with_prefix("PREINIT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(" ")
                    .with_list_parse_key("launch.options"),
            )
            .build()?
            .try_deserialize()
    }

    /// Load configuration from one explicit file, over the defaults.
    pub fn load_from_file(path: &Path) -> Result<LauncherConfig, ConfigError> {
        merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .build()?
            .try_deserialize()
    }
}
