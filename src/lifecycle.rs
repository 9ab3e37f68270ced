//! Context lifecycle: snapshot reuse or fresh construction at startup,
//! finalize and dispose at shutdown.

pub mod factory;
pub mod manager;

pub use factory::{ContextFactory, StandardContextFactory};
pub use manager::{ContextLifecycleManager, ShutdownReport, StartupPath, StartupReport};
