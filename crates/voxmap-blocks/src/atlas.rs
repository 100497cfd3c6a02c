use serde::Deserialize;

/// Fixed geometry of the block texture atlas. Tiles are square and laid out
/// row-major from the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct AtlasLayout {
    #[serde(default = "default_atlas_width")]
    pub atlas_width: u32,
    #[serde(default = "default_tile_width")]
    pub tile_width: u32,
    #[serde(default = "default_tile_rows")]
    pub tile_rows: u32,
}

fn default_atlas_width() -> u32 {
    256
}
fn default_tile_width() -> u32 {
    16
}
fn default_tile_rows() -> u32 {
    16
}

impl Default for AtlasLayout {
    fn default() -> Self {
        Self {
            atlas_width: default_atlas_width(),
            tile_width: default_tile_width(),
            tile_rows: default_tile_rows(),
        }
    }
}

impl AtlasLayout {
    #[inline]
    pub fn tiles_per_row(&self) -> u32 {
        (self.atlas_width / self.tile_width.max(1)).max(1)
    }

    #[inline]
    pub fn tile_count(&self) -> u32 {
        self.tiles_per_row() * self.tile_rows.max(1)
    }

    /// Normalized `(u, v)` of a tile's top-left texel. Indices past the last
    /// tile wrap around.
    pub fn uv_origin(&self, index: u16) -> (f32, f32) {
        let index = u32::from(index) % self.tile_count();
        let per_row = self.tiles_per_row();
        let col = index % per_row;
        let row = index / per_row;
        let (du, dv) = self.tile_extent();
        (col as f32 * du, row as f32 * dv)
    }

    /// Normalized size of one tile.
    #[inline]
    pub fn tile_extent(&self) -> (f32, f32) {
        (
            1.0 / self.tiles_per_row() as f32,
            1.0 / self.tile_rows.max(1) as f32,
        )
    }
}
