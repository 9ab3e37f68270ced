//! Requested startup configuration.
//!
//! Built once per process start from the resolved startup options and the
//! captured environment. Validation happens in [`ConfigurationBuilder::build`];
//! a built `Configuration` is always well-formed and immutable.

use crate::environment::EnvironmentSnapshot;
use crate::error::OptionsError;
use crate::types::FeatureId;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    native_backend: bool,
    polyglot_stdio: bool,
    sync_stdio: bool,
    disabled_features: BTreeSet<FeatureId>,
    environment: EnvironmentSnapshot,
}

impl Configuration {
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::default()
    }

    /// `platform.native`
    pub fn native_backend(&self) -> bool {
        self.native_backend
    }

    /// `polyglot.stdio`
    pub fn polyglot_stdio(&self) -> bool {
        self.polyglot_stdio
    }

    /// `sync.stdio`
    pub fn sync_stdio(&self) -> bool {
        self.sync_stdio
    }

    pub fn disabled_features(&self) -> &BTreeSet<FeatureId> {
        &self.disabled_features
    }

    /// Environment observed at process start.
    pub fn environment(&self) -> &EnvironmentSnapshot {
        &self.environment
    }

    /// True when either stdio option differs from its default.
    pub fn custom_stdio(&self) -> bool {
        self.polyglot_stdio || self.sync_stdio
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            native_backend: true,
            polyglot_stdio: false,
            sync_stdio: false,
            disabled_features: BTreeSet::new(),
            environment: EnvironmentSnapshot::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigurationBuilder {
    inner: Configuration,
}

impl Default for ConfigurationBuilder {
    fn default() -> Self {
        Self {
            inner: Configuration::default(),
        }
    }
}

impl ConfigurationBuilder {
    pub fn native_backend(mut self, value: bool) -> Self {
        self.inner.native_backend = value;
        self
    }

    pub fn polyglot_stdio(mut self, value: bool) -> Self {
        self.inner.polyglot_stdio = value;
        self
    }

    pub fn sync_stdio(mut self, value: bool) -> Self {
        self.inner.sync_stdio = value;
        self
    }

    pub fn disable_feature(mut self, feature: FeatureId) -> Self {
        self.inner.disabled_features.insert(feature);
        self
    }

    pub fn environment(mut self, environment: EnvironmentSnapshot) -> Self {
        self.inner.environment = environment;
        self
    }

    pub fn build(self) -> Result<Configuration, OptionsError> {
        for (name, _) in self.inner.environment.iter() {
            if name.is_empty() || name.contains('=') || name.contains('\0') {
                return Err(OptionsError::InvalidEnvironment(name.to_string()));
            }
        }
        Ok(self.inner)
    }
}
