//! Snapshot persistence using bincode serialization.
//!
//! A snapshot is `[bincode payload][magic "SWS1"][u32 CRC32 BE]`. Writes go
//! to a temp file and are renamed into place so a crash never leaves a
//! half-written snapshot behind. Loading verifies the checksum and then the
//! structural invariants of the deserialized index, since the payload may
//! come from an older or foreign build of the crate.
//!
//! The layer-assignment RNG is not part of a snapshot; a loaded index
//! re-seeds from entropy, which only matters if more inserts follow the load.

use crate::index::VectorIndex;
use std::fs;
use std::io;
use std::path::Path;

/// Magic bytes preceding the CRC32 footer.
const SNAPSHOT_MAGIC: &[u8; 4] = b"SWS1";

/// Saves an index snapshot to `path` with an atomic temp-file + rename.
pub fn save_index(index: &VectorIndex, path: &Path) -> io::Result<()> {
    let bytes = bincode::serialize(index).map_err(|e| io::Error::other(e.to_string()))?;
    let crc = crc32fast::hash(&bytes);

    let mut output = Vec::with_capacity(bytes.len() + 8);
    output.extend_from_slice(&bytes);
    output.extend_from_slice(SNAPSHOT_MAGIC);
    output.extend_from_slice(&crc.to_be_bytes());

    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, &output)?;
    fs::rename(&tmp_path, path)?;

    tracing::info!(
        path = %path.display(),
        bytes = output.len(),
        vectors = index.len(),
        "index snapshot saved"
    );
    Ok(())
}

/// Loads an index snapshot from `path`, verifying the CRC32 footer and the
/// structural invariants of the graph and store.
pub fn load_index(path: &Path) -> io::Result<VectorIndex> {
    let bytes = fs::read(path)?;
    if bytes.len() < 8 || &bytes[bytes.len() - 8..bytes.len() - 4] != SNAPSHOT_MAGIC {
        tracing::warn!(path = %path.display(), "snapshot missing CRC32 footer");
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "snapshot missing CRC32 footer",
        ));
    }

    let payload = &bytes[..bytes.len() - 8];
    let stored_crc = u32::from_be_bytes(bytes[bytes.len() - 4..].try_into().expect("4 bytes"));
    let actual_crc = crc32fast::hash(payload);
    if stored_crc != actual_crc {
        tracing::warn!(
            path = %path.display(),
            stored = stored_crc,
            actual = actual_crc,
            "snapshot CRC32 mismatch"
        );
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "snapshot CRC32 mismatch",
        ));
    }

    let index: VectorIndex =
        bincode::deserialize(payload).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    if let Some(inner) = &index.inner {
        inner
            .store
            .check_consistency()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        inner
            .graph
            .check_consistency(inner.store.len())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    }

    tracing::info!(path = %path.display(), vectors = index.len(), "index snapshot loaded");
    Ok(index)
}
