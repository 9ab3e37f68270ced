//! Context states and the transitions allowed between them.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextState {
    /// Snapshot loaded, not yet patched.
    Fresh,
    /// Snapshot patched with the live environment; ready to run.
    Patched,
    /// Freshly allocated, not yet initialized.
    Created,
    /// Full initialization sequence completed; ready to run.
    Initialized,
    Finalized,
    Disposed,
}

impl ContextState {
    pub fn as_str(self) -> &'static str {
        match self {
            ContextState::Fresh => "fresh",
            ContextState::Patched => "patched",
            ContextState::Created => "created",
            ContextState::Initialized => "initialized",
            ContextState::Finalized => "finalized",
            ContextState::Disposed => "disposed",
        }
    }

    /// Transition table. Every edge moves forward, so no state is revisited.
    pub fn can_transition_to(self, next: ContextState) -> bool {
        use ContextState::*;
        matches!(
            (self, next),
            (Fresh, Patched)
                | (Fresh, Disposed)
                | (Created, Initialized)
                | (Created, Disposed)
                | (Patched, Finalized)
                | (Initialized, Finalized)
                | (Finalized, Disposed)
        )
    }
}

impl fmt::Display for ContextState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
