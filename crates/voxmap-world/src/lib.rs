//! World sizing, noise, terrain generation and the toroidal block grid.
#![forbid(unsafe_code)]

pub mod coord;
pub mod grid;
pub mod noise;
pub mod terrain;
pub mod worldgen;

pub use coord::ChunkCoord;
pub use grid::{ChunkColumns, WorldGrid};
pub use noise::{ColumnRng, NoiseField, NoiseKind};
pub use terrain::TerrainGenerator;
pub use worldgen::{WorldGenConfig, WorldGenConfigError, WorldGenParams};

use voxmap_blocks::BlockState;

/// Horizontal edge length of a chunk, and height of one vertical slice.
pub const CHUNK_SIZE: usize = 32;
/// Vertical slices per chunk column.
pub const CHUNK_VERTICAL_COUNT: usize = 8;
pub const CHUNK_HEIGHT: usize = CHUNK_SIZE * CHUNK_VERTICAL_COUNT;
/// Cells in one full chunk column.
pub const CHUNK_CELLS: usize = CHUNK_SIZE * CHUNK_SIZE * CHUNK_HEIGHT;

/// Read access to block cells by world coordinate.
///
/// Anything the source does not hold (above/below the world, outside the
/// resident window) reads as [`BlockState::SKY`].
pub trait BlockSource {
    fn block(&self, wx: i32, wy: i32, wz: i32) -> BlockState;
}

impl<T: BlockSource + ?Sized> BlockSource for &T {
    #[inline]
    fn block(&self, wx: i32, wy: i32, wz: i32) -> BlockState {
        (**self).block(wx, wy, wz)
    }
}
