//! Error types for the pre-initialized context startup lifecycle.

use crate::context::{ContextState, StdStream};
use thiserror::Error;

/// Failures while patching a loaded snapshot. Recoverable: the lifecycle
/// manager falls back to building a fresh context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    #[error("cannot patch a context in state {state}")]
    InvalidState { state: ContextState },

    #[error("failed to rebind {stream}: {reason}")]
    StreamRewireFailed { stream: StdStream, reason: String },
}

/// Allocation of a fresh context failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("createContext failed: {message}")]
pub struct CreateError {
    pub message: String,
}

impl CreateError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The full initialization sequence of a fresh context failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("initializeContext failed: {message}")]
pub struct InitializeError {
    pub message: String,
}

impl InitializeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Lifecycle errors. `Create` and `Initialize` are fatal to startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("invalid context transition: {from} -> {to}")]
    InvalidTransition { from: ContextState, to: ContextState },

    #[error("context lifecycle already started")]
    AlreadyStarted,

    #[error("context lifecycle not started")]
    NotStarted,

    #[error(transparent)]
    Create(#[from] CreateError),

    #[error(transparent)]
    Initialize(#[from] InitializeError),
}

/// Startup option resolution errors. Surfaced when a `Configuration` is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    #[error("unknown option {0}")]
    UnknownOption(String),

    #[error("invalid value for {option}: {value}")]
    InvalidValue { option: String, value: String },

    #[error("missing argument for {0}")]
    MissingArgument(String),

    #[error("unknown feature: {0}")]
    UnknownFeature(String),

    #[error("invalid environment variable name: {0:?}")]
    InvalidEnvironment(String),
}

/// Snapshot artifact errors.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a snapshot artifact (bad magic)")]
    BadMagic,

    #[error("unsupported snapshot format version {0}")]
    UnsupportedVersion(u16),

    #[error("snapshot checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("snapshot decode failed: {0}")]
    Decode(String),

    #[error("snapshot encode failed: {0}")]
    Encode(String),
}

/// Top-level error for the launcher surface.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Options(#[from] OptionsError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Program error: {0}")]
    Program(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for StartupError {
    fn from(err: config::ConfigError) -> Self {
        StartupError::ConfigError(err.to_string())
    }
}
