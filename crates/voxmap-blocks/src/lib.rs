//! Block types, packed per-cell state, and atlas geometry.
#![forbid(unsafe_code)]

pub mod atlas;
pub mod config;
pub mod registry;
pub mod state;

pub use atlas::AtlasLayout;
pub use config::BlockConfigError;
pub use registry::{BlockDef, BlockInfo, BlockRegistry, Density, FaceSlot};
pub use state::{AIR, BlockId, BlockState, MAX_LIGHT};
