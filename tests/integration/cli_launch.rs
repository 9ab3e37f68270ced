//! End-to-end launches of the `preinit` binary.

use super::test_utils::{preinit_command, write_artifact};
use preinit::environment::EnvironmentSnapshot;
use preinit::snapshot::SnapshotMetadata;
use std::process::Output;
use tempfile::TempDir;

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn default_options_reuse_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let output = preinit_command(&temp_dir)
        .args(["run", "--", "-Xlog=fine", "-e", "p Boot.was_preinitialized?"])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr={}", stderr(&output));
    assert_eq!(stdout(&output), "true\n");
    let log = stderr(&output);
    assert!(log.contains("patchContext()"), "stderr={}", log);
    assert!(!log.contains("createContext()"), "stderr={}", log);
    assert!(!log.contains("not reusing pre-initialized context"), "stderr={}", log);
}

#[test]
fn incompatible_options_build_fresh_context() {
    let temp_dir = TempDir::new().unwrap();
    let output = preinit_command(&temp_dir)
        .args([
            "run",
            "--",
            "-Xlog=fine",
            "-Xplatform.native=false",
            "-Xpolyglot.stdio=true",
            "-Xsync.stdio=true",
            "--disable-gems",
            "-e",
            "p Boot.was_preinitialized?",
        ])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr={}", stderr(&output));
    assert_eq!(stdout(&output), "false\n");

    let log = stderr(&output);
    let patch = log.find("patchContext()").expect("patchContext() logged");
    let reason = log
        .find("not reusing pre-initialized context: platform.native is false")
        .expect("reason logged");
    let create = log.find("createContext()").expect("createContext() logged");
    let initialize = log.find("initializeContext()").expect("initializeContext() logged");
    assert!(patch < reason && reason < create && create < initialize, "stderr={}", log);
}

#[test]
fn lifecycle_is_silent_without_log_option() {
    let temp_dir = TempDir::new().unwrap();
    let output = preinit_command(&temp_dir)
        .args(["run", "--", "-e", "p Boot.was_preinitialized?"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout(&output), "true\n");
    assert!(!stderr(&output).contains("patchContext()"));
}

#[test]
fn program_sees_variable_set_at_launch() {
    let temp_dir = TempDir::new().unwrap();
    for extra in [&[][..], &["-Xsync.stdio=true"][..]] {
        let mut args = vec!["run", "--"];
        args.extend_from_slice(extra);
        args.extend_from_slice(&["-e", "print ENV['TR_PRE_INIT_NEW_VAR']"]);
        let output = preinit_command(&temp_dir)
            .env("TR_PRE_INIT_NEW_VAR", "true")
            .args(&args)
            .output()
            .unwrap();
        assert!(output.status.success(), "stderr={}", stderr(&output));
        assert_eq!(stdout(&output), "true");
    }
}

#[test]
fn artifact_environment_is_replaced_by_launch_environment() {
    let temp_dir = TempDir::new().unwrap();
    let build_env: EnvironmentSnapshot = [("X", "build")].into_iter().collect();
    let artifact = write_artifact(temp_dir.path(), SnapshotMetadata::default(), build_env);

    let output = preinit_command(&temp_dir)
        .env("X", "1")
        .arg("run")
        .arg("--snapshot")
        .arg(&artifact)
        .args(["--", "-e", "print ENV['X']"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr={}", stderr(&output));
    assert_eq!(stdout(&output), "1");
}

#[test]
fn options_from_env_var_are_applied() {
    let temp_dir = TempDir::new().unwrap();
    let output = preinit_command(&temp_dir)
        .env("PREINIT_OPTS", "-Xpolyglot.stdio=true")
        .args(["run", "--", "-e", "p Boot.was_preinitialized?"])
        .output()
        .unwrap();
    assert_eq!(stdout(&output), "false\n");

    let output = preinit_command(&temp_dir)
        .env("PREINIT_OPTS", "-Xpolyglot.stdio=true")
        .args(["run", "--", "-Xread_opts=false", "-e", "p Boot.was_preinitialized?"])
        .output()
        .unwrap();
    assert_eq!(stdout(&output), "true\n");
}

#[test]
fn metrics_time_reports_on_stderr() {
    let temp_dir = TempDir::new().unwrap();
    let output = preinit_command(&temp_dir)
        .args(["run", "--", "-Xmetrics.time", "-e", "p Boot.was_preinitialized?"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout(&output), "true\n");
    let log = stderr(&output);
    assert!(log.lines().any(|l| l.starts_with("before-main ")), "stderr={}", log);
    assert!(log.lines().any(|l| l.starts_with("after-main ")), "stderr={}", log);
}

#[test]
fn qualified_boot_expression_is_accepted() {
    let temp_dir = TempDir::new().unwrap();
    let output = preinit_command(&temp_dir)
        .args(["run", "--", "-e", "p Truffle::Boot.was_preinitialized?"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr={}", stderr(&output));
    assert_eq!(stdout(&output), "true\n");
}

#[test]
fn options_flag_prints_catalog_without_starting() {
    let temp_dir = TempDir::new().unwrap();
    let output = preinit_command(&temp_dir)
        .args(["run", "--", "-Xlog=fine", "-Xoptions"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr={}", stderr(&output));
    assert!(stdout(&output).contains("platform.native"));
    assert!(!stderr(&output).contains("patchContext()"));
}

#[test]
fn version_flag_prints_package_version() {
    let temp_dir = TempDir::new().unwrap();
    let output = preinit_command(&temp_dir).arg("--version").output().unwrap();
    assert!(output.status.success());
    assert_eq!(
        stdout(&output).trim_end(),
        format!("preinit {}", env!("CARGO_PKG_VERSION"))
    );
}

#[test]
fn corrupt_artifact_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.snap");
    std::fs::write(&path, b"not a snapshot").unwrap();

    let output = preinit_command(&temp_dir)
        .arg("run")
        .arg("--snapshot")
        .arg(&path)
        .args(["--", "-e", "p Boot.was_preinitialized?"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("preinit: "));
}

#[test]
fn unknown_option_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let output = preinit_command(&temp_dir)
        .args(["run", "--", "-Xwarp.drive=true"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("-Xwarp.drive"));
}

#[test]
fn check_and_inspect_describe_the_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let output = preinit_command(&temp_dir)
        .args(["check", "--", "-Xsync.stdio=true"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim_end(), "recreate: sync.stdio mismatch");

    let output = preinit_command(&temp_dir)
        .args(["inspect", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["source"], "embedded");
    assert_eq!(value["metadata"]["built_with_native_backend"], true);
}
