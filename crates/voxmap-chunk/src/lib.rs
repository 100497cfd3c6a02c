//! Chunk cache slots, window planning, and worker snapshots.
#![forbid(unsafe_code)]

mod cache;
mod snapshot;

pub use cache::{CacheCounts, ChunkCache, ChunkSlot, GenState, MeshInstall, MeshState};
pub use snapshot::ChunkSnapshot;
