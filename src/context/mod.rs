//! Context domain: the runtime execution state owned by the lifecycle manager.

pub mod state;
pub mod stdio;

pub use state::ContextState;
pub use stdio::{StdStream, StdioBinding, StreamHandle, StreamWriter};

use crate::configuration::Configuration;
use crate::environment::EnvironmentSnapshot;
use crate::error::{InitializeError, LifecycleError};
use crate::snapshot::{SnapshotImage, SnapshotMetadata};
use crate::types::{active_features, FeatureId};
use std::collections::BTreeSet;
use std::io::{self, Write};

/// Where a context came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextOrigin {
    /// Loaded from a pre-initialized snapshot.
    Snapshot(SnapshotMetadata),
    /// Built from scratch at startup.
    Fresh,
}

#[derive(Debug)]
pub struct Context {
    origin: ContextOrigin,
    state: ContextState,
    environment: EnvironmentSnapshot,
    stdio: StdioBinding,
    features: BTreeSet<FeatureId>,
    initialization_runs: u32,
}

impl Context {
    /// Load a snapshot image. The context starts `Fresh` and carries the
    /// image's build-time environment and stdio until it is patched.
    pub fn from_image(image: SnapshotImage) -> Self {
        let features = image.metadata.active_features();
        Self {
            origin: ContextOrigin::Snapshot(image.metadata),
            state: ContextState::Fresh,
            environment: image.environment,
            stdio: image.stdio,
            features,
            // Initialization ran once, in the build process.
            initialization_runs: 1,
        }
    }

    /// Allocate an empty context in state `Created`.
    pub fn allocate() -> Self {
        Self {
            origin: ContextOrigin::Fresh,
            state: ContextState::Created,
            environment: EnvironmentSnapshot::new(),
            stdio: StdioBinding::for_process(std::process::id(), false, false),
            features: BTreeSet::new(),
            initialization_runs: 0,
        }
    }

    pub fn state(&self) -> ContextState {
        self.state
    }

    pub fn origin(&self) -> &ContextOrigin {
        &self.origin
    }

    /// True when this context came from the snapshot.
    pub fn was_preinitialized(&self) -> bool {
        matches!(self.origin, ContextOrigin::Snapshot(_))
    }

    pub fn environment(&self) -> &EnvironmentSnapshot {
        &self.environment
    }

    pub fn env_var(&self, name: &str) -> Option<&str> {
        self.environment.get(name)
    }

    pub fn stdio(&self) -> &StdioBinding {
        &self.stdio
    }

    pub fn features(&self) -> &BTreeSet<FeatureId> {
        &self.features
    }

    pub fn feature_enabled(&self, feature: &FeatureId) -> bool {
        self.features.contains(feature)
    }

    /// How many times the top-level initialization sequence ran for this context.
    pub fn initialization_runs(&self) -> u32 {
        self.initialization_runs
    }

    /// Run the full initialization sequence on a `Created` context, reading
    /// the live environment and binding `stdio`. Leaves the state unchanged;
    /// the lifecycle manager records the transition.
    pub fn run_initialization(
        &mut self,
        config: &Configuration,
        stdio: StdioBinding,
    ) -> Result<(), InitializeError> {
        if self.state != ContextState::Created {
            return Err(InitializeError::new(format!(
                "context is {}, expected created",
                self.state
            )));
        }
        self.environment = config.environment().clone();
        self.features = active_features(config.disabled_features());
        self.stdio = stdio;
        self.initialization_runs += 1;
        Ok(())
    }

    /// Write `text` through the stdout binding into `out`.
    pub fn write_output<W: Write>(&self, out: W, text: &str) -> io::Result<()> {
        let mut writer = StreamWriter::new(out, self.stdio.stdout.synchronized);
        writer.write_all(text.as_bytes())?;
        writer.flush()
    }

    pub(crate) fn environment_mut(&mut self) -> &mut EnvironmentSnapshot {
        &mut self.environment
    }

    pub(crate) fn stdio_mut(&mut self) -> &mut StdioBinding {
        &mut self.stdio
    }

    pub(crate) fn transition(&mut self, next: ContextState) -> Result<(), LifecycleError> {
        if !self.state.can_transition_to(next) {
            return Err(LifecycleError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }

    /// Drop everything the context holds. Only valid once `Disposed`.
    pub(crate) fn release(&mut self) {
        debug_assert_eq!(self.state, ContextState::Disposed);
        self.environment = EnvironmentSnapshot::new();
        self.features.clear();
    }
}
