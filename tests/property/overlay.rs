//! Properties of overlaying the live environment onto a snapshot.

use preinit::environment::EnvironmentSnapshot;
use proptest::prelude::*;
use std::collections::BTreeMap;

fn env_map() -> impl Strategy<Value = BTreeMap<String, String>> {
    proptest::collection::btree_map("[A-Z_]{1,6}", "[a-z0-9/]{0,8}", 0..8)
}

/// After an overlay the snapshot equals the live environment exactly.
#[test]
fn test_overlay_converges_on_live_environment_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(env_map(), env_map()), |(built, live)| {
            let mut snapshot: EnvironmentSnapshot = built.clone().into_iter().collect();
            let live: EnvironmentSnapshot = live.into_iter().collect();

            let diff = snapshot.overlay(&live);
            prop_assert_eq!(&snapshot, &live);

            for name in &diff.removed {
                prop_assert!(built.contains_key(name));
                prop_assert!(!live.contains(name));
            }
            for name in &diff.added {
                prop_assert!(!built.contains_key(name));
            }
            Ok(())
        })
        .unwrap();
}

/// A second overlay with the same live environment changes nothing.
#[test]
fn test_overlay_is_idempotent_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(env_map(), env_map()), |(built, live)| {
            let mut snapshot: EnvironmentSnapshot = built.into_iter().collect();
            let live: EnvironmentSnapshot = live.into_iter().collect();
            snapshot.overlay(&live);
            let again = snapshot.overlay(&live);
            prop_assert!(again.added.is_empty());
            prop_assert!(again.updated.is_empty());
            prop_assert!(again.removed.is_empty());
            Ok(())
        })
        .unwrap();
}
