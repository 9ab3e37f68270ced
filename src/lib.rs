//! preinit: Pre-initialized Context Startup
//!
//! Starts a runtime context either by patching a snapshot captured at build
//! time or, when the requested options are incompatible with that snapshot,
//! by creating and initializing a fresh context. Both paths leave the program
//! observing the same environment and standard streams.

pub mod cli;
pub mod compat;
pub mod config;
pub mod configuration;
pub mod context;
pub mod environment;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod options;
pub mod patch;
pub mod program;
pub mod snapshot;
pub mod telemetry;
pub mod types;
