//! Lifecycle event sinks.

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::telemetry::events::{LifecycleEvent, LifecycleRecord};

/// Receives every lifecycle transition, in order.
pub trait LifecycleEventSink {
    fn record(&mut self, event: &LifecycleEvent);
}

impl<S: LifecycleEventSink + ?Sized> LifecycleEventSink for &mut S {
    fn record(&mut self, event: &LifecycleEvent) {
        (**self).record(event);
    }
}

impl<S: LifecycleEventSink + ?Sized> LifecycleEventSink for Box<S> {
    fn record(&mut self, event: &LifecycleEvent) {
        (**self).record(event);
    }
}

/// Fan out to two sinks.
impl<A: LifecycleEventSink, B: LifecycleEventSink> LifecycleEventSink for (A, B) {
    fn record(&mut self, event: &LifecycleEvent) {
        self.0.record(event);
        self.1.record(event);
    }
}

/// Logs each event through `tracing` at debug level (`-Xlog=fine`).
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LifecycleEventSink for TracingSink {
    fn record(&mut self, event: &LifecycleEvent) {
        debug!(target: "preinit::lifecycle", kind = event.kind(), "{}", event);
    }
}

/// Keeps events in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    events: Vec<LifecycleEvent>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[LifecycleEvent] {
        &self.events
    }

    /// Rendered lines, as an observer of the log stream would see them.
    pub fn lines(&self) -> Vec<String> {
        self.events.iter().map(ToString::to_string).collect()
    }

    pub fn contains(&self, event: &LifecycleEvent) -> bool {
        self.events.contains(event)
    }

    pub fn position(&self, event: &LifecycleEvent) -> Option<usize> {
        self.events.iter().position(|e| e == event)
    }
}

impl LifecycleEventSink for MemorySink {
    fn record(&mut self, event: &LifecycleEvent) {
        self.events.push(event.clone());
    }
}

/// Clonable handle onto a shared `MemorySink`, for inspecting events after
/// the sink has been moved into a lifecycle manager.
#[derive(Debug, Clone, Default)]
pub struct SharedSink {
    inner: Arc<Mutex<MemorySink>>,
}

impl SharedSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.inner.lock().events().to_vec()
    }

    pub fn lines(&self) -> Vec<String> {
        self.inner.lock().lines()
    }
}

impl LifecycleEventSink for SharedSink {
    fn record(&mut self, event: &LifecycleEvent) {
        self.inner.lock().record(event);
    }
}

/// Writes one JSON `LifecycleRecord` per line.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    next_seq: u64,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            next_seq: 1,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> LifecycleEventSink for JsonLinesSink<W> {
    fn record(&mut self, event: &LifecycleEvent) {
        let record = LifecycleRecord::with_now(self.next_seq, event.clone());
        self.next_seq += 1;
        let line = match serde_json::to_string(&record) {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "Failed to serialize lifecycle event");
                return;
            }
        };
        if let Err(e) = writeln!(self.writer, "{}", line).and_then(|_| self.writer.flush()) {
            warn!(error = %e, "Failed to write lifecycle event");
        }
    }
}
