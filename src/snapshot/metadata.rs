//! Attributes recorded when a snapshot was built.

use crate::types::{active_features, FeatureId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub built_with_native_backend: bool,
    pub built_with_polyglot_stdio: bool,
    pub built_with_sync_stdio: bool,
    #[serde(default)]
    pub built_disabled_features: BTreeSet<FeatureId>,
}

impl SnapshotMetadata {
    /// Features loaded into the snapshot at build time.
    pub fn active_features(&self) -> BTreeSet<FeatureId> {
        active_features(&self.built_disabled_features)
    }

    pub fn was_active(&self, feature: &FeatureId) -> bool {
        !self.built_disabled_features.contains(feature)
    }
}

impl Default for SnapshotMetadata {
    /// Metadata of a snapshot built with every startup option at its default.
    fn default() -> Self {
        Self {
            built_with_native_backend: true,
            built_with_polyglot_stdio: false,
            built_with_sync_stdio: false,
            built_disabled_features: BTreeSet::new(),
        }
    }
}
