//! Slow-path construction of a context from scratch.

use crate::configuration::Configuration;
use crate::context::{Context, StdioBinding};
use crate::error::{CreateError, InitializeError};

/// Builds and initializes a fresh context when the snapshot cannot be reused.
/// Failures here are fatal to startup.
pub trait ContextFactory {
    /// Allocate a context in state `Created`.
    fn create(&mut self, config: &Configuration) -> Result<Context, CreateError>;

    /// Run the full initialization sequence, reading the live environment.
    fn initialize(
        &mut self,
        context: &mut Context,
        config: &Configuration,
    ) -> Result<(), InitializeError>;
}

/// Allocates in-process and binds the current process's standard streams.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardContextFactory;

impl ContextFactory for StandardContextFactory {
    fn create(&mut self, _config: &Configuration) -> Result<Context, CreateError> {
        Ok(Context::allocate())
    }

    fn initialize(
        &mut self,
        context: &mut Context,
        config: &Configuration,
    ) -> Result<(), InitializeError> {
        let stdio = StdioBinding::for_process(
            std::process::id(),
            config.polyglot_stdio(),
            config.sync_stdio(),
        );
        context.run_initialization(config, stdio)
    }
}
