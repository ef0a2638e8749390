//! Storage layer: snapshot persistence for built indexes.
//!
//! Persistence is an adapter around the in-memory index, not part of the
//! graph algorithm. The index remains fully usable without ever touching
//! disk.

/// Snapshot save/load with bincode serialization and CRC32 integrity footer.
pub mod snapshot;

pub use snapshot::{load_index, save_index};
