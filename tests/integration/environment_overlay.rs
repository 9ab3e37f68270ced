//! The program observes the live environment whichever path startup takes.

use preinit::configuration::Configuration;
use preinit::environment::EnvironmentSnapshot;
use preinit::lifecycle::ContextLifecycleManager;
use preinit::program::Program;
use preinit::snapshot::{SnapshotImage, SnapshotMetadata};
use preinit::telemetry::MemorySink;

fn build_time_env() -> EnvironmentSnapshot {
    [("TR_PRE_INIT_STALE", "build"), ("PATH", "/build/bin")]
        .into_iter()
        .collect()
}

fn live_env() -> EnvironmentSnapshot {
    [("TR_PRE_INIT_NEW_VAR", "true"), ("PATH", "/usr/bin")]
        .into_iter()
        .collect()
}

fn observed(config: Configuration) -> (bool, EnvironmentSnapshot) {
    let image = SnapshotImage::new(SnapshotMetadata::default(), build_time_env(), 0);
    let mut manager = ContextLifecycleManager::new(MemorySink::new());
    manager.start(&config, image).unwrap();
    let live = manager.live().unwrap();
    (live.was_preinitialized(), live.environment().clone())
}

#[test]
fn both_paths_observe_identical_environment() {
    let fast = Configuration::builder().environment(live_env()).build().unwrap();
    let slow = Configuration::builder()
        .environment(live_env())
        .polyglot_stdio(true)
        .build()
        .unwrap();

    let (fast_reused, fast_env) = observed(fast);
    let (slow_reused, slow_env) = observed(slow);
    assert!(fast_reused);
    assert!(!slow_reused);
    assert_eq!(fast_env, slow_env);
    assert_eq!(fast_env, live_env());
}

#[test]
fn patched_context_sees_new_and_updated_variables() {
    let config = Configuration::builder().environment(live_env()).build().unwrap();
    let image = SnapshotImage::new(SnapshotMetadata::default(), build_time_env(), 0);
    let mut manager = ContextLifecycleManager::new(MemorySink::new());
    let report = manager.start(&config, image).unwrap();

    let patch = report.patch.clone().unwrap();
    assert_eq!((patch.env_added, patch.env_updated, patch.env_removed), (1, 1, 1));

    let live = manager.live().unwrap();
    let mut out = Vec::new();
    Program::parse("print ENV['TR_PRE_INIT_NEW_VAR']")
        .unwrap()
        .run(live, &mut out)
        .unwrap();
    assert_eq!(out, b"true");
    assert_eq!(live.env_var("PATH"), Some("/usr/bin"));
    assert_eq!(live.env_var("TR_PRE_INIT_STALE"), None);
}
