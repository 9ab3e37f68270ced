//! Rejection of an incompatible snapshot and fresh construction.

use preinit::configuration::Configuration;
use preinit::context::ContextState;
use preinit::lifecycle::{ContextLifecycleManager, StartupPath};
use preinit::snapshot::SnapshotImage;
use preinit::telemetry::{SharedSink, NOT_REUSING_PREFIX};
use preinit::types::FeatureId;

fn recreate(config: Configuration) -> (Vec<String>, String) {
    let events = SharedSink::new();
    let mut manager = ContextLifecycleManager::new(events.clone());
    let reason = match &manager.start(&config, SnapshotImage::embedded()).unwrap().path {
        StartupPath::Recreated { reason } => reason.clone(),
        StartupPath::Patched => panic!("expected the snapshot to be rejected"),
    };
    let live = manager.live().unwrap();
    assert!(!live.was_preinitialized());
    assert_eq!(live.state(), ContextState::Initialized);
    assert_eq!(live.initialization_runs(), 1);
    (events.lines(), reason)
}

#[test]
fn incompatible_options_log_reason_then_create_and_initialize() {
    let config = Configuration::builder()
        .native_backend(false)
        .polyglot_stdio(true)
        .sync_stdio(true)
        .disable_feature(FeatureId::parse("gems").unwrap())
        .build()
        .unwrap();
    let (lines, reason) = recreate(config);
    assert_eq!(reason, "platform.native is false");
    assert_eq!(
        lines,
        vec![
            "patchContext()".to_string(),
            format!("{}platform.native is false", NOT_REUSING_PREFIX),
            "disposeContext()".to_string(),
            "createContext()".to_string(),
            "initializeContext()".to_string(),
        ]
    );
}

#[test]
fn each_incompatibility_names_its_reason() {
    let cases = [
        (
            Configuration::builder().polyglot_stdio(true).build().unwrap(),
            "polyglot.stdio mismatch",
        ),
        (
            Configuration::builder().sync_stdio(true).build().unwrap(),
            "sync.stdio mismatch",
        ),
        (
            Configuration::builder()
                .disable_feature(FeatureId::parse("rubyopt").unwrap())
                .build()
                .unwrap(),
            "feature disabled: rubyopt",
        ),
    ];
    for (config, expected) in cases {
        let (lines, reason) = recreate(config);
        assert_eq!(reason, expected);
        let create = lines.iter().position(|l| l == "createContext()").unwrap();
        let initialize = lines.iter().position(|l| l == "initializeContext()").unwrap();
        let patch = lines.iter().position(|l| l == "patchContext()").unwrap();
        assert!(patch < create && create < initialize);
    }
}

#[test]
fn recreated_context_honors_disabled_features() {
    let gems = FeatureId::parse("gems").unwrap();
    let config = Configuration::builder()
        .disable_feature(gems.clone())
        .build()
        .unwrap();
    let mut manager = ContextLifecycleManager::new(SharedSink::new());
    manager.start(&config, SnapshotImage::embedded()).unwrap();
    let live = manager.live().unwrap();
    assert!(!live.feature_enabled(&gems));
    assert!(live.feature_enabled(&FeatureId::parse("did_you_mean").unwrap()));
}
