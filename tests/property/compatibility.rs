//! Properties of the compatibility decision and the path it selects.

use preinit::compat::{CompatibilityChecker, CompatibilityResult};
use preinit::configuration::Configuration;
use preinit::lifecycle::ContextLifecycleManager;
use preinit::snapshot::{SnapshotImage, SnapshotMetadata};
use preinit::telemetry::{LifecycleEvent, MemorySink};
use preinit::types::{FeatureId, BUILTIN_FEATURES};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn feature_set() -> impl Strategy<Value = BTreeSet<FeatureId>> {
    proptest::sample::subsequence(BUILTIN_FEATURES.to_vec(), 0..=BUILTIN_FEATURES.len()).prop_map(
        |names| {
            names
                .into_iter()
                .map(|name| FeatureId::parse(name).unwrap())
                .collect()
        },
    )
}

fn configuration() -> impl Strategy<Value = Configuration> {
    (any::<bool>(), any::<bool>(), any::<bool>(), feature_set()).prop_map(
        |(native, polyglot, sync, disabled)| {
            let mut builder = Configuration::builder()
                .native_backend(native)
                .polyglot_stdio(polyglot)
                .sync_stdio(sync);
            for feature in disabled {
                builder = builder.disable_feature(feature);
            }
            builder.build().unwrap()
        },
    )
}

fn metadata() -> impl Strategy<Value = SnapshotMetadata> {
    (any::<bool>(), any::<bool>(), any::<bool>(), feature_set()).prop_map(
        |(native, polyglot, sync, disabled)| SnapshotMetadata {
            built_with_native_backend: native,
            built_with_polyglot_stdio: polyglot,
            built_with_sync_stdio: sync,
            built_disabled_features: disabled,
        },
    )
}

/// The same inputs always produce the same decision and reason.
#[test]
fn test_check_is_deterministic_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(configuration(), metadata()), |(config, meta)| {
            let checker = CompatibilityChecker::new();
            prop_assert_eq!(checker.check(&config, &meta), checker.check(&config, &meta));
            Ok(())
        })
        .unwrap();
}

/// Native backend off always rejects, whatever else is set.
#[test]
fn test_non_native_never_reuses_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(configuration(), metadata()), |(config, meta)| {
            if !config.native_backend() {
                prop_assert_eq!(
                    CompatibilityChecker::new().check(&config, &meta),
                    CompatibilityResult::Incompatible("platform.native is false".to_string())
                );
            }
            Ok(())
        })
        .unwrap();
}

/// Exactly one of the two paths runs, and the event stream says which.
#[test]
fn test_start_takes_exactly_one_path_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(configuration(), metadata()), |(config, meta)| {
            let expected = CompatibilityChecker::new().check(&config, &meta);
            let image = SnapshotImage::new(meta, Default::default(), 0);

            let mut manager = ContextLifecycleManager::new(MemorySink::new());
            let reused = manager.start(&config, image).unwrap().reused_snapshot();
            prop_assert_eq!(reused, expected.is_compatible());
            prop_assert_eq!(manager.live().unwrap().was_preinitialized(), reused);

            let sink = manager.into_sink();
            prop_assert_eq!(sink.events().first(), Some(&LifecycleEvent::PatchContext));
            let created = sink.contains(&LifecycleEvent::CreateContext);
            let initialized = sink.contains(&LifecycleEvent::InitializeContext);
            prop_assert_eq!(created, !reused);
            prop_assert_eq!(initialized, !reused);
            if let Some(reason) = expected.reason() {
                prop_assert_eq!(sink.position(&LifecycleEvent::not_reusing(reason)), Some(1));
            }
            Ok(())
        })
        .unwrap();
}
