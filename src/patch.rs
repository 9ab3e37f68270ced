//! Patching a loaded snapshot with the live process state.
//!
//! A patch overlays the live environment onto the snapshot's captured mapping
//! and, when the stdio options are not at their defaults, rebinds the standard
//! streams to the current process. Initialization code is never re-run.

use crate::configuration::Configuration;
use crate::context::{Context, ContextState, StdStream, StdioBinding, StreamHandle};
use crate::error::PatchError;
use std::io;
use tracing::{debug, trace};

/// Seam for binding a standard stream of the current process.
pub trait StreamBinder {
    fn bind(
        &mut self,
        stream: StdStream,
        polyglot: bool,
        synchronized: bool,
    ) -> Result<StreamHandle, PatchError>;
}

/// Binds the current process's real standard streams.
#[derive(Debug, Clone, Copy)]
pub struct ProcessStreamBinder {
    pid: u32,
}

impl ProcessStreamBinder {
    pub fn new() -> Self {
        Self {
            pid: std::process::id(),
        }
    }
}

impl Default for ProcessStreamBinder {
    fn default() -> Self {
        Self::new()
    }
}

/// Duplicate the stream's descriptor; fails when it is closed or invalid.
#[cfg(unix)]
fn check_stream(stream: StdStream) -> io::Result<()> {
    use std::os::fd::AsFd;

    let duplicate = match stream {
        StdStream::Stdin => io::stdin().as_fd().try_clone_to_owned(),
        StdStream::Stdout => io::stdout().as_fd().try_clone_to_owned(),
        StdStream::Stderr => io::stderr().as_fd().try_clone_to_owned(),
    }?;
    drop(duplicate);
    Ok(())
}

#[cfg(not(unix))]
fn check_stream(_stream: StdStream) -> io::Result<()> {
    Ok(())
}

impl StreamBinder for ProcessStreamBinder {
    fn bind(
        &mut self,
        stream: StdStream,
        polyglot: bool,
        synchronized: bool,
    ) -> Result<StreamHandle, PatchError> {
        check_stream(stream).map_err(|e| PatchError::StreamRewireFailed {
            stream,
            reason: e.to_string(),
        })?;
        Ok(StreamHandle {
            stream,
            owner_pid: self.pid,
            polyglot,
            synchronized,
        })
    }
}

/// Summary of a successful patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchReport {
    pub env_added: usize,
    pub env_updated: usize,
    pub env_removed: usize,
    pub streams_rebound: Vec<StdStream>,
}

#[derive(Debug)]
pub struct EnvironmentPatcher<B: StreamBinder = ProcessStreamBinder> {
    binder: B,
}

impl EnvironmentPatcher<ProcessStreamBinder> {
    pub fn for_process() -> Self {
        Self::new(ProcessStreamBinder::new())
    }
}

impl<B: StreamBinder> EnvironmentPatcher<B> {
    pub fn new(binder: B) -> Self {
        Self { binder }
    }

    /// Patch a `Fresh` context. On error the context is left untouched.
    pub fn patch(
        &mut self,
        context: &mut Context,
        config: &Configuration,
    ) -> Result<PatchReport, PatchError> {
        if context.state() != ContextState::Fresh {
            return Err(PatchError::InvalidState {
                state: context.state(),
            });
        }

        let mut report = PatchReport::default();

        // Rebind into a staged copy so a failure mid-way leaves nothing half-applied.
        let mut staged: StdioBinding = *context.stdio();
        if config.custom_stdio() {
            for stream in StdStream::ALL {
                let handle =
                    self.binder
                        .bind(stream, config.polyglot_stdio(), config.sync_stdio())?;
                trace!(%stream, owner_pid = handle.owner_pid, "Rebound stream");
                staged.set(handle);
                report.streams_rebound.push(stream);
            }
        }

        let diff = context.environment_mut().overlay(config.environment());
        *context.stdio_mut() = staged;

        report.env_added = diff.added.len();
        report.env_updated = diff.updated.len();
        report.env_removed = diff.removed.len();
        debug!(
            env_added = report.env_added,
            env_updated = report.env_updated,
            env_removed = report.env_removed,
            streams_rebound = report.streams_rebound.len(),
            "Patched pre-initialized context"
        );
        Ok(report)
    }
}
