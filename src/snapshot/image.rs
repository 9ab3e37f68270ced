//! In-memory image of a pre-initialized context.

use crate::context::StdioBinding;
use crate::environment::EnvironmentSnapshot;
use crate::snapshot::SnapshotMetadata;
use serde::{Deserialize, Serialize};

/// Process id recorded for images that ship inside the launcher binary.
pub const EMBEDDED_BUILD_PID: u32 = 0;

/// State captured when the snapshot was built. Loading an image yields a
/// `Fresh` context; the environment and stdio here are stale until patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotImage {
    pub metadata: SnapshotMetadata,
    pub environment: EnvironmentSnapshot,
    pub stdio: StdioBinding,
}

impl SnapshotImage {
    pub fn new(metadata: SnapshotMetadata, environment: EnvironmentSnapshot, build_pid: u32) -> Self {
        let stdio = StdioBinding::for_process(
            build_pid,
            metadata.built_with_polyglot_stdio,
            metadata.built_with_sync_stdio,
        );
        Self {
            metadata,
            environment,
            stdio,
        }
    }

    /// The image bundled with the launcher: default options, empty environment.
    pub fn embedded() -> Self {
        Self::new(
            SnapshotMetadata::default(),
            EnvironmentSnapshot::new(),
            EMBEDDED_BUILD_PID,
        )
    }
}
