//! Shared identifier types.

use crate::error::OptionsError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Features the runtime loads during initialization unless disabled.
pub const BUILTIN_FEATURES: &[&str] = &["did_you_mean", "gems", "rubyopt"];

/// Identifier of an optional runtime feature (`--disable-<feature>`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(String);

impl FeatureId {
    /// Parse a feature name, rejecting anything outside the built-in catalog.
    pub fn parse(name: &str) -> Result<Self, OptionsError> {
        if BUILTIN_FEATURES.contains(&name) {
            Ok(Self(name.to_string()))
        } else {
            Err(OptionsError::UnknownFeature(name.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Every built-in feature, in catalog order.
    pub fn catalog() -> BTreeSet<FeatureId> {
        BUILTIN_FEATURES
            .iter()
            .map(|name| FeatureId(name.to_string()))
            .collect()
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Features active after disabling `disabled` from the catalog.
pub fn active_features(disabled: &BTreeSet<FeatureId>) -> BTreeSet<FeatureId> {
    FeatureId::catalog()
        .into_iter()
        .filter(|feature| !disabled.contains(feature))
        .collect()
}
