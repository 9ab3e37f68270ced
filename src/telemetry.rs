//! Telemetry domain: lifecycle events and the sinks that record them.

pub mod events;
pub mod sinks;

pub use events::{LifecycleEvent, LifecycleRecord, NOT_REUSING_PREFIX};
pub use sinks::{JsonLinesSink, LifecycleEventSink, MemorySink, SharedSink, TracingSink};
