//! Startup option resolution.
//!
//! Runtime options arrive as an ordered list of flags:
//!
//! - `-X<key>=<value>` or `-X<key>` (shorthand for `=true`)
//! - `--disable-<feature>` (repeatable)
//! - `-e <program>`
//!
//! Later settings win. Options from `PREINIT_OPTS` are applied after the
//! command line unless `-Xread_opts=false` was given.

use crate::configuration::Configuration;
use crate::environment::EnvironmentSnapshot;
use crate::error::OptionsError;
use crate::logging::runtime_level_to_filter;
use crate::types::FeatureId;

/// Environment variable holding extra whitespace-separated runtime options.
pub const OPTIONS_ENV_VAR: &str = "PREINIT_OPTS";

pub const PLATFORM_NATIVE: &str = "platform.native";
pub const POLYGLOT_STDIO: &str = "polyglot.stdio";
pub const SYNC_STDIO: &str = "sync.stdio";
pub const LOG: &str = "log";
pub const READ_OPTS: &str = "read_opts";
pub const METRICS_TIME: &str = "metrics.time";
pub const OPTIONS: &str = "options";

const BOOL_KEYS: &[&str] = &[
    PLATFORM_NATIVE,
    POLYGLOT_STDIO,
    SYNC_STDIO,
    READ_OPTS,
    METRICS_TIME,
    OPTIONS,
];

/// Every `-X` key with its default and a one-line description, in help order.
const CATALOG: &[(&str, &str, &str)] = &[
    (PLATFORM_NATIVE, "true", "run on the native backend"),
    (POLYGLOT_STDIO, "false", "route standard streams through the embedder"),
    (SYNC_STDIO, "false", "flush standard streams after every write"),
    (LOG, "warning", "runtime log level (off, severe, warning, info, config, fine, finer, finest, all)"),
    (READ_OPTS, "true", "read extra options from PREINIT_OPTS"),
    (METRICS_TIME, "false", "print before-main and after-main times on stderr"),
    (OPTIONS, "false", "print available runtime options and exit"),
];

/// Text printed for `-Xoptions`.
pub fn describe_options() -> String {
    let mut output = String::from("Runtime options (-X<key>=<value>):\n");
    for (key, default, description) in CATALOG {
        output.push_str(&format!("  {:<16} {:<8} {}\n", key, default, description));
    }
    output.push_str(&format!(
        "\nFeatures (--disable-<feature>): {}",
        crate::types::BUILTIN_FEATURES.join(", ")
    ));
    output
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupOption {
    Set { key: String, value: String },
    Disable(FeatureId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOptions {
    options: Vec<StartupOption>,
    program: Option<String>,
}

/// Everything the launcher needs after option resolution.
#[derive(Debug, Clone)]
pub struct ResolvedOptions {
    pub configuration: Configuration,
    pub metrics_time: bool,
    /// `-Xoptions`: describe the options instead of starting.
    pub print_options: bool,
    pub program: Option<String>,
}

fn parse_bool(key: &str, value: &str) -> Result<bool, OptionsError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(OptionsError::InvalidValue {
            option: key.to_string(),
            value: value.to_string(),
        }),
    }
}

fn validate_setting(key: &str, value: &str) -> Result<(), OptionsError> {
    if BOOL_KEYS.contains(&key) {
        parse_bool(key, value).map(|_| ())
    } else if key == LOG {
        runtime_level_to_filter(value)
            .map(|_| ())
            .ok_or_else(|| OptionsError::InvalidValue {
                option: key.to_string(),
                value: value.to_string(),
            })
    } else {
        Err(OptionsError::UnknownOption(format!("-X{}", key)))
    }
}

impl LaunchOptions {
    pub fn parse<I, S>(args: I) -> Result<Self, OptionsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed = Self::default();
        parsed.push_args(args)?;
        Ok(parsed)
    }

    fn push_args<I, S>(&mut self, args: I) -> Result<(), OptionsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let arg = arg.as_ref();
            if let Some(setting) = arg.strip_prefix("-X") {
                let (key, value) = setting.split_once('=').unwrap_or((setting, "true"));
                validate_setting(key, value)?;
                self.options.push(StartupOption::Set {
                    key: key.to_string(),
                    value: value.to_string(),
                });
            } else if let Some(feature) = arg.strip_prefix("--disable-") {
                self.options
                    .push(StartupOption::Disable(FeatureId::parse(feature)?));
            } else if arg == "-e" {
                let program = args
                    .next()
                    .ok_or_else(|| OptionsError::MissingArgument("-e".to_string()))?;
                self.program = Some(program.as_ref().to_string());
            } else {
                return Err(OptionsError::UnknownOption(arg.to_string()));
            }
        }
        Ok(())
    }

    pub fn options(&self) -> &[StartupOption] {
        &self.options
    }

    /// Requested runtime log level (`-Xlog=<level>`), if any.
    pub fn log_level(&self) -> Option<&str> {
        self.setting(LOG)
    }

    /// Last value set for `key`.
    fn setting(&self, key: &str) -> Option<&str> {
        self.options.iter().rev().find_map(|option| match option {
            StartupOption::Set { key: k, value } if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    fn flag(&self, key: &str, default: bool) -> Result<bool, OptionsError> {
        self.setting(key)
            .map(|value| parse_bool(key, value))
            .unwrap_or(Ok(default))
    }

    /// Append options from `PREINIT_OPTS` unless `-Xread_opts=false`.
    pub fn extend_from_env(&mut self, env: &EnvironmentSnapshot) -> Result<(), OptionsError> {
        if !self.flag(READ_OPTS, true)? {
            return Ok(());
        }
        match env.get(OPTIONS_ENV_VAR) {
            Some(value) if !value.trim().is_empty() => {
                let extra: Vec<String> = value.split_whitespace().map(str::to_string).collect();
                self.push_args(extra)
            }
            _ => Ok(()),
        }
    }

    /// Build the `Configuration` and launcher settings. `environment` is the
    /// mapping captured at process start.
    pub fn resolve(&self, environment: EnvironmentSnapshot) -> Result<ResolvedOptions, OptionsError> {
        let mut builder = Configuration::builder()
            .native_backend(self.flag(PLATFORM_NATIVE, true)?)
            .polyglot_stdio(self.flag(POLYGLOT_STDIO, false)?)
            .sync_stdio(self.flag(SYNC_STDIO, false)?)
            .environment(environment);
        for option in &self.options {
            if let StartupOption::Disable(feature) = option {
                builder = builder.disable_feature(feature.clone());
            }
        }

        Ok(ResolvedOptions {
            configuration: builder.build()?,
            metrics_time: self.flag(METRICS_TIME, false)?,
            print_options: self.flag(OPTIONS, false)?,
            program: self.program.clone(),
        })
    }
}
