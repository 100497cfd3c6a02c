use serde::{Deserialize, Serialize};

use crate::CHUNK_SIZE;

/// Horizontal chunk column coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cz: i32) -> Self {
        Self { cx, cz }
    }

    /// Chunk holding world block column `(wx, wz)`.
    #[inline]
    pub const fn containing_block(wx: i32, wz: i32) -> Self {
        Self {
            cx: wx.div_euclid(CHUNK_SIZE as i32),
            cz: wz.div_euclid(CHUNK_SIZE as i32),
        }
    }

    /// Chunk holding a world-space point, flooring toward negative infinity.
    #[inline]
    pub fn containing_point(x: f32, z: f32) -> Self {
        Self::containing_block(x.floor() as i32, z.floor() as i32)
    }

    #[inline]
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cz: self.cz + dz,
        }
    }

    /// World block coordinate of the column's `(0, 0)` corner.
    #[inline]
    pub const fn origin(self) -> (i32, i32) {
        (self.cx * CHUNK_SIZE as i32, self.cz * CHUNK_SIZE as i32)
    }

    #[inline]
    pub fn distance_sq(self, other: ChunkCoord) -> i64 {
        let dx = i64::from(self.cx - other.cx);
        let dz = i64::from(self.cz - other.cz);
        dx * dx + dz * dz
    }

    /// The four axis-adjacent columns: -X, +X, -Z, +Z.
    #[inline]
    pub fn neighbors4(self) -> [ChunkCoord; 4] {
        [
            self.offset(-1, 0),
            self.offset(1, 0),
            self.offset(0, -1),
            self.offset(0, 1),
        ]
    }
}

impl From<(i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<ChunkCoord> for (i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_blocks_floor_into_negative_chunks() {
        assert_eq!(ChunkCoord::containing_block(-1, 0), ChunkCoord::new(-1, 0));
        assert_eq!(ChunkCoord::containing_block(-32, -33), ChunkCoord::new(-1, -2));
        assert_eq!(ChunkCoord::containing_block(31, 32), ChunkCoord::new(0, 1));
        assert_eq!(ChunkCoord::containing_point(-0.25, 63.9), ChunkCoord::new(-1, 1));
    }

    #[test]
    fn origin_scales_by_chunk_size() {
        assert_eq!(ChunkCoord::new(-2, 3).origin(), (-64, 96));
    }
}
