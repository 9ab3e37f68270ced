//! Snapshot compatibility check.
//!
//! Decides whether a snapshot built under `SnapshotMetadata` can serve the
//! requested `Configuration`. Predicates run in a fixed order and the first
//! failure wins, so the reported reason is stable for a given input.

use crate::configuration::Configuration;
use crate::snapshot::SnapshotMetadata;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "reason", rename_all = "snake_case")]
pub enum CompatibilityResult {
    Compatible,
    /// Diagnostic reason; only ever logged.
    Incompatible(String),
}

impl CompatibilityResult {
    pub fn is_compatible(&self) -> bool {
        matches!(self, CompatibilityResult::Compatible)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            CompatibilityResult::Compatible => None,
            CompatibilityResult::Incompatible(reason) => Some(reason),
        }
    }
}

impl fmt::Display for CompatibilityResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompatibilityResult::Compatible => f.write_str("compatible"),
            CompatibilityResult::Incompatible(reason) => write!(f, "incompatible: {}", reason),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CompatibilityChecker;

impl CompatibilityChecker {
    pub fn new() -> Self {
        Self
    }

    pub fn check(&self, config: &Configuration, meta: &SnapshotMetadata) -> CompatibilityResult {
        if !config.native_backend() {
            return CompatibilityResult::Incompatible("platform.native is false".to_string());
        }

        if config.polyglot_stdio() && !meta.built_with_polyglot_stdio {
            return CompatibilityResult::Incompatible("polyglot.stdio mismatch".to_string());
        }

        if config.sync_stdio() && !meta.built_with_sync_stdio {
            return CompatibilityResult::Incompatible("sync.stdio mismatch".to_string());
        }

        // BTreeSet iteration is sorted
        if let Some(feature) = config
            .disabled_features()
            .iter()
            .find(|feature| meta.was_active(feature))
        {
            return CompatibilityResult::Incompatible(format!("feature disabled: {}", feature));
        }

        CompatibilityResult::Compatible
    }
}
