//! Persistence protocol.
//!
//! The only boundary the engine exposes besides its method calls: a JSON
//! snapshot of the full state for the save/load layer.

pub mod snapshot;

pub use snapshot::{Snapshot, SnapshotError};
