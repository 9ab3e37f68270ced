//! Stored snapshot artifact.
//!
//! Layout: 6-byte magic, u16 LE format version, 32-byte BLAKE3 of the payload,
//! then bincode(SnapshotImage).

use crate::error::SnapshotError;
use crate::snapshot::SnapshotImage;
use blake3::Hasher;
use std::fs;
use std::path::Path;
use tracing::debug;

const MAGIC: &[u8; 6] = b"PRECTX";
const FORMAT_VERSION: u16 = 1;
const HEADER_LEN: usize = MAGIC.len() + 2 + 32;

/// A decoded artifact: the image plus the checksum it was stored with.
#[derive(Debug, Clone)]
pub struct SnapshotArtifact {
    pub image: SnapshotImage,
    pub checksum: [u8; 32],
}

fn payload_checksum(payload: &[u8]) -> [u8; 32] {
    let mut hasher = Hasher::new();
    hasher.update(payload);
    *hasher.finalize().as_bytes()
}

impl SnapshotArtifact {
    pub fn checksum_hex(&self) -> String {
        hex::encode(self.checksum)
    }

    pub fn encode(image: &SnapshotImage) -> Result<Vec<u8>, SnapshotError> {
        let payload =
            bincode::serialize(image).map_err(|e| SnapshotError::Encode(e.to_string()))?;
        let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        bytes.extend_from_slice(&payload_checksum(&payload));
        bytes.extend_from_slice(&payload);
        Ok(bytes)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, SnapshotError> {
        if bytes.len() < HEADER_LEN || &bytes[..MAGIC.len()] != MAGIC {
            return Err(SnapshotError::BadMagic);
        }
        let version = u16::from_le_bytes([bytes[6], bytes[7]]);
        if version != FORMAT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(version));
        }

        let mut expected = [0u8; 32];
        expected.copy_from_slice(&bytes[8..HEADER_LEN]);
        let payload = &bytes[HEADER_LEN..];
        let actual = payload_checksum(payload);
        if actual != expected {
            return Err(SnapshotError::ChecksumMismatch {
                expected: hex::encode(expected),
                actual: hex::encode(actual),
            });
        }

        let image: SnapshotImage =
            bincode::deserialize(payload).map_err(|e| SnapshotError::Decode(e.to_string()))?;
        Ok(Self {
            image,
            checksum: expected,
        })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let artifact = Self::decode(&bytes)?;
        debug!(
            path = %path.display(),
            checksum = %artifact.checksum_hex(),
            "Loaded snapshot artifact"
        );
        Ok(artifact)
    }

    /// Write atomically via a temporary file and rename.
    pub fn write<P: AsRef<Path>>(image: &SnapshotImage, path: P) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let bytes = Self::encode(image)?;
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &bytes)?;
        fs::rename(&temp_path, path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            SnapshotError::Io(e)
        })
    }
}
