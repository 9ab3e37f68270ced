//! Pre-initialized context snapshots: build-time metadata, the captured image,
//! and the stored artifact format.

pub mod artifact;
pub mod image;
pub mod metadata;

pub use artifact::SnapshotArtifact;
pub use image::SnapshotImage;
pub use metadata::SnapshotMetadata;
