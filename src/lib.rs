//! Streaming voxel world core: chunked block grid, terrain, meshing and picking.
#![forbid(unsafe_code)]

pub mod clock;
pub mod config;
pub mod raycast;
pub mod state;
pub mod visibility;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, EngineConfig, StreamingSection, WorldSection};
pub use raycast::{RayHit, STEPS_PER_UNIT, raycast_first_hit};
pub use state::{InitError, StreamStats, TickStats, WorldState};
pub use visibility::{DrawItem, chunk_center};

pub use voxmap_blocks as blocks;
pub use voxmap_chunk as chunk;
pub use voxmap_geom as geom;
pub use voxmap_mesh_cpu as mesh;
pub use voxmap_world as world;
