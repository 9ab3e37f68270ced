//! Property-based tests for startup determinism guarantees

mod compatibility;
mod overlay;
