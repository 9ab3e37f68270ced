//! Lifecycle event schema.
//!
//! `Display` renders the fixed vocabulary external observers match on:
//! `patchContext()`, `createContext()`, `initializeContext()`,
//! `finalizeContext()`, `disposeContext()` and
//! `not reusing pre-initialized context: <reason>`.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const NOT_REUSING_PREFIX: &str = "not reusing pre-initialized context: ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// Attempt to reuse the snapshot. Emitted first, whatever the outcome.
    PatchContext,
    /// The snapshot was rejected; carries the diagnostic reason.
    NotReusing { reason: String },
    CreateContext,
    InitializeContext,
    FinalizeContext,
    DisposeContext,
}

impl LifecycleEvent {
    pub fn not_reusing(reason: impl Into<String>) -> Self {
        LifecycleEvent::NotReusing {
            reason: reason.into(),
        }
    }

    /// Short machine name, stable across releases.
    pub fn kind(&self) -> &'static str {
        match self {
            LifecycleEvent::PatchContext => "patch_context",
            LifecycleEvent::NotReusing { .. } => "not_reusing",
            LifecycleEvent::CreateContext => "create_context",
            LifecycleEvent::InitializeContext => "initialize_context",
            LifecycleEvent::FinalizeContext => "finalize_context",
            LifecycleEvent::DisposeContext => "dispose_context",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleEvent::PatchContext => f.write_str("patchContext()"),
            LifecycleEvent::NotReusing { reason } => write!(f, "{}{}", NOT_REUSING_PREFIX, reason),
            LifecycleEvent::CreateContext => f.write_str("createContext()"),
            LifecycleEvent::InitializeContext => f.write_str("initializeContext()"),
            LifecycleEvent::FinalizeContext => f.write_str("finalizeContext()"),
            LifecycleEvent::DisposeContext => f.write_str("disposeContext()"),
        }
    }
}

/// An event with its position in the process's lifecycle sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleRecord {
    pub ts: String,
    pub seq: u64,
    pub message: String,
    #[serde(flatten)]
    pub event: LifecycleEvent,
}

impl LifecycleRecord {
    pub fn with_now(seq: u64, event: LifecycleEvent) -> Self {
        Self {
            ts: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            seq,
            message: event.to_string(),
            event,
        }
    }
}
