//! Environment mapping passed explicitly into the context lifecycle.
//!
//! The lifecycle never reads the process environment on its own. The launcher
//! captures it once with [`EnvironmentSnapshot::capture`] and hands the value
//! down, which keeps the overlay semantics testable without touching globals.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordered name -> value mapping of environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvironmentSnapshot {
    vars: BTreeMap<String, String>,
}

/// What an overlay changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayDiff {
    pub added: Vec<String>,
    pub updated: Vec<String>,
    pub removed: Vec<String>,
}

impl OverlayDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }
}

impl EnvironmentSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current process environment. Non-UTF-8 entries are converted lossily.
    pub fn capture() -> Self {
        std::env::vars_os()
            .map(|(k, v)| {
                (
                    k.to_string_lossy().into_owned(),
                    v.to_string_lossy().into_owned(),
                )
            })
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.vars.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Make `self` match `live`: live values win, new names are added and names
    /// missing from `live` are dropped.
    pub fn overlay(&mut self, live: &EnvironmentSnapshot) -> OverlayDiff {
        let mut diff = OverlayDiff::default();

        for (name, value) in &live.vars {
            match self.vars.insert(name.clone(), value.clone()) {
                None => diff.added.push(name.clone()),
                Some(previous) if previous != *value => diff.updated.push(name.clone()),
                Some(_) => {}
            }
        }

        let stale: Vec<String> = self
            .vars
            .keys()
            .filter(|name| !live.vars.contains_key(*name))
            .cloned()
            .collect();
        for name in stale {
            self.vars.remove(&name);
            diff.removed.push(name);
        }

        diff
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvironmentSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
