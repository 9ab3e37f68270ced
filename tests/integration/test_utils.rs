//! Shared test utilities for integration tests
//!
//! Centralizes environment isolation for in-process config tests and the
//! command builder for launching the `preinit` binary.

use preinit::environment::EnvironmentSnapshot;
use preinit::snapshot::{SnapshotArtifact, SnapshotImage, SnapshotMetadata};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;
use tempfile::TempDir;

/// Global mutex to serialize process environment access across tests.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Variables the config loader reads; captured and restored around each test.
const ISOLATED_VARS: &[&str] = &[
    "HOME",
    "XDG_CONFIG_HOME",
    "PREINIT_ENV",
    "PREINIT__SNAPSHOT__PATH",
    "PREINIT__LAUNCH__OPTIONS",
];

struct EnvState {
    vars: Vec<(&'static str, Option<String>)>,
}

impl EnvState {
    fn capture() -> Self {
        Self {
            vars: ISOLATED_VARS
                .iter()
                .map(|name| (*name, std::env::var(name).ok()))
                .collect(),
        }
    }

    fn restore(self) {
        for (name, value) in self.vars {
            match value {
                Some(orig) => std::env::set_var(name, orig),
                None => std::env::remove_var(name),
            }
        }
    }
}

/// Run `f` with HOME and XDG_CONFIG_HOME pointed into `test_dir`, restoring
/// the original environment afterwards.
pub fn with_isolated_env<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let env_state = EnvState::capture();

    let config_home = test_dir.path().join("xdg-config");
    let home = test_dir.path().join("home");
    std::fs::create_dir_all(&config_home).unwrap();
    std::fs::create_dir_all(&home).unwrap();

    std::env::set_var("HOME", home.to_str().unwrap());
    std::env::set_var("XDG_CONFIG_HOME", config_home.to_str().unwrap());
    std::env::remove_var("PREINIT_ENV");
    std::env::remove_var("PREINIT__SNAPSHOT__PATH");
    std::env::remove_var("PREINIT__LAUNCH__OPTIONS");

    let result = f();

    env_state.restore();

    result
}

/// `preinit` with a clean environment rooted in `test_dir`.
pub fn preinit_command(test_dir: &TempDir) -> Command {
    let home = test_dir.path().join("home");
    let config_home = test_dir.path().join("xdg-config");
    std::fs::create_dir_all(&home).unwrap();
    std::fs::create_dir_all(&config_home).unwrap();

    let mut command = Command::new(env!("CARGO_BIN_EXE_preinit"));
    command
        .env_clear()
        .env("HOME", &home)
        .env("XDG_CONFIG_HOME", &config_home)
        .arg("--workspace")
        .arg(test_dir.path());
    command
}

/// Write a snapshot artifact built under `metadata` with `environment`.
pub fn write_artifact(
    dir: &Path,
    metadata: SnapshotMetadata,
    environment: EnvironmentSnapshot,
) -> PathBuf {
    let path = dir.join("context.snap");
    let image = SnapshotImage::new(metadata, environment, 0);
    SnapshotArtifact::write(&image, &path).unwrap();
    path
}
