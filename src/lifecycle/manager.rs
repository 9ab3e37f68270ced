//! The startup state machine.
//!
//! `start` always loads the snapshot and announces the attempt with
//! `patchContext()`. A compatible snapshot is patched and becomes live. An
//! incompatible one, or one whose patch fails, is disposed and replaced by a
//! freshly created and initialized context. `shutdown` finalizes and disposes
//! whichever context is live.
//!
//! Runs once, on the main thread, before any user code. There is no locking:
//! the manager is the only owner of the live context.

use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use crate::compat::{CompatibilityChecker, CompatibilityResult};
use crate::configuration::Configuration;
use crate::context::{Context, ContextState};
use crate::error::{CreateError, LifecycleError};
use crate::lifecycle::factory::{ContextFactory, StandardContextFactory};
use crate::patch::{EnvironmentPatcher, PatchReport, ProcessStreamBinder, StreamBinder};
use crate::snapshot::SnapshotImage;
use crate::telemetry::{LifecycleEvent, LifecycleEventSink};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "path", rename_all = "snake_case")]
pub enum StartupPath {
    /// Fast path: the snapshot was patched and reused.
    Patched,
    /// Slow path: the snapshot was rejected and a fresh context was built.
    Recreated { reason: String },
}

#[derive(Debug, Clone)]
pub struct StartupReport {
    pub path: StartupPath,
    pub patch: Option<PatchReport>,
    pub duration_ms: u128,
}

impl StartupReport {
    pub fn reused_snapshot(&self) -> bool {
        self.path == StartupPath::Patched
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShutdownReport {
    pub was_preinitialized: bool,
}

pub struct ContextLifecycleManager<
    S: LifecycleEventSink,
    F: ContextFactory = StandardContextFactory,
    B: StreamBinder = ProcessStreamBinder,
> {
    sink: S,
    factory: F,
    patcher: EnvironmentPatcher<B>,
    checker: CompatibilityChecker,
    live: Option<Context>,
    started: bool,
    report: Option<StartupReport>,
}

impl<S: LifecycleEventSink> ContextLifecycleManager<S> {
    /// Manager wired to the current process.
    pub fn new(sink: S) -> Self {
        Self::with_parts(sink, StandardContextFactory, ProcessStreamBinder::new())
    }
}

impl<S: LifecycleEventSink, F: ContextFactory, B: StreamBinder> ContextLifecycleManager<S, F, B> {
    pub fn with_parts(sink: S, factory: F, binder: B) -> Self {
        Self {
            sink,
            factory,
            patcher: EnvironmentPatcher::new(binder),
            checker: CompatibilityChecker::new(),
            live: None,
            started: false,
            report: None,
        }
    }

    fn emit(&mut self, event: LifecycleEvent) {
        self.sink.record(&event);
    }

    /// Bring up the live context for `config`, reusing `image` if possible.
    ///
    /// Returns a fatal error only when the slow path fails; in that case no
    /// context is left live.
    pub fn start(
        &mut self,
        config: &Configuration,
        image: SnapshotImage,
    ) -> Result<&StartupReport, LifecycleError> {
        if self.started {
            return Err(LifecycleError::AlreadyStarted);
        }
        self.started = true;
        let started_at = Instant::now();

        let metadata = image.metadata.clone();
        let mut snapshot = Context::from_image(image);
        self.emit(LifecycleEvent::PatchContext);

        let reason = match self.checker.check(config, &metadata) {
            CompatibilityResult::Compatible => match self.patcher.patch(&mut snapshot, config) {
                Ok(patch) => {
                    snapshot.transition(ContextState::Patched)?;
                    self.live = Some(snapshot);
                    let report = StartupReport {
                        path: StartupPath::Patched,
                        patch: Some(patch),
                        duration_ms: started_at.elapsed().as_millis(),
                    };
                    info!(duration_ms = report.duration_ms, "Reusing pre-initialized context");
                    return Ok(self.report.insert(report));
                }
                Err(e) => {
                    warn!(error = %e, "Patching pre-initialized context failed, building a fresh one");
                    e.to_string()
                }
            },
            CompatibilityResult::Incompatible(reason) => reason,
        };

        self.emit(LifecycleEvent::not_reusing(reason.clone()));
        snapshot.transition(ContextState::Disposed)?;
        self.emit(LifecycleEvent::DisposeContext);
        snapshot.release();
        drop(snapshot);

        self.emit(LifecycleEvent::CreateContext);
        let mut fresh = self.factory.create(config)?;
        if fresh.state() != ContextState::Created {
            return Err(CreateError::new(format!(
                "factory returned a context in state {}",
                fresh.state()
            ))
            .into());
        }

        self.emit(LifecycleEvent::InitializeContext);
        if let Err(e) = self.factory.initialize(&mut fresh, config) {
            fresh.transition(ContextState::Disposed)?;
            fresh.release();
            return Err(e.into());
        }
        fresh.transition(ContextState::Initialized)?;
        self.live = Some(fresh);

        let report = StartupReport {
            path: StartupPath::Recreated { reason },
            patch: None,
            duration_ms: started_at.elapsed().as_millis(),
        };
        info!(duration_ms = report.duration_ms, "Built fresh context");
        Ok(self.report.insert(report))
    }

    /// The live context, once `start` has succeeded and until `shutdown`.
    pub fn live(&self) -> Option<&Context> {
        self.live.as_ref()
    }

    pub fn report(&self) -> Option<&StartupReport> {
        self.report.as_ref()
    }

    /// Finalize then dispose the live context.
    pub fn shutdown(&mut self) -> Result<ShutdownReport, LifecycleError> {
        let mut context = self.live.take().ok_or(LifecycleError::NotStarted)?;
        let was_preinitialized = context.was_preinitialized();

        context.transition(ContextState::Finalized)?;
        self.emit(LifecycleEvent::FinalizeContext);
        context.transition(ContextState::Disposed)?;
        self.emit(LifecycleEvent::DisposeContext);
        context.release();

        Ok(ShutdownReport { was_preinitialized })
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
