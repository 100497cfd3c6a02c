use voxmap_blocks::{AIR, BlockId, BlockRegistry, BlockState, MAX_LIGHT};

use crate::grid::{ChunkColumns, WorldGrid};
use crate::noise::{ColumnRng, NoiseField};
use crate::worldgen::{WorldGenConfigError, WorldGenParams};
use crate::{CHUNK_HEIGHT, CHUNK_SIZE, ChunkCoord};

#[derive(Clone, Copy, Debug)]
struct SurfaceIds {
    primary: BlockId,
    secondary: BlockId,
    subsoil: BlockId,
    floor: BlockId,
    liquid: BlockId,
}

/// Noise-driven column filler. Output depends only on the world seed, the
/// params, and the column coordinate.
pub struct TerrainGenerator {
    seed: u64,
    field: NoiseField,
    params: WorldGenParams,
    ids: SurfaceIds,
}

impl TerrainGenerator {
    pub fn new(
        seed: u64,
        params: WorldGenParams,
        reg: &BlockRegistry,
    ) -> Result<Self, WorldGenConfigError> {
        params.validate()?;
        let id = |name: &str| {
            reg.id_by_name(name)
                .ok_or_else(|| WorldGenConfigError::UnknownBlock(name.to_string()))
        };
        let ids = SurfaceIds {
            primary: id(&params.surface_primary)?,
            secondary: id(&params.surface_secondary)?,
            subsoil: id(&params.subsoil)?,
            floor: id(&params.floor)?,
            liquid: id(&params.liquid)?,
        };
        let field = NoiseField::new(seed, params.noise, params.frequency, params.octaves);
        Ok(Self {
            seed,
            field,
            params,
            ids,
        })
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn params(&self) -> &WorldGenParams {
        &self.params
    }

    #[inline]
    pub fn height_at(&self, x: i32, z: i32) -> f64 {
        self.params.base_height + self.params.amplitude * self.field.sample(x, z)
    }

    /// Chance the column's surface uses the primary block rather than the
    /// secondary one. Zero at or below the ocean, one past the shore band.
    fn primary_chance(&self, height: f64) -> f64 {
        let above = height - f64::from(self.params.ocean_level);
        if self.params.shore_band <= 0.0 {
            return if above > 0.0 { 1.0 } else { 0.0 };
        }
        (above / self.params.shore_band).clamp(0.0, 1.0)
    }

    /// Fills one world column, lowest Y first.
    pub fn fill_column(&self, x: i32, z: i32, column: &mut [BlockState]) {
        debug_assert_eq!(column.len(), CHUNK_HEIGHT);
        let height = self.height_at(x, z);
        let mut rng = ColumnRng::for_column(self.seed, x, z);
        let surface = if rng.next_f64() < self.primary_chance(height) {
            self.ids.primary
        } else {
            self.ids.secondary
        };

        let ids = self.ids;
        let mut previous = AIR;
        let mut sun = MAX_LIGHT;
        for y in (0..column.len()).rev() {
            let yi = y as i32;
            let ty = if yi < self.params.floor_depth {
                ids.floor
            } else if (y as f64) < height {
                if previous == AIR || previous == ids.liquid {
                    surface
                } else {
                    ids.subsoil
                }
            } else if yi <= self.params.ocean_level {
                ids.liquid
            } else {
                AIR
            };
            if ty != AIR {
                sun = 0;
            }
            column[y] = BlockState::new(ty).with_sunlight(sun);
            previous = ty;
        }
    }

    /// Overwrites the grid slot for `coord` and marks it resident.
    pub fn generate_chunk(&self, grid: &mut WorldGrid, coord: ChunkCoord) {
        let (ox, oz) = coord.origin();
        for lz in 0..CHUNK_SIZE as i32 {
            for lx in 0..CHUNK_SIZE as i32 {
                let (wx, wz) = (ox + lx, oz + lz);
                self.fill_column(wx, wz, grid.column_mut(wx, wz));
            }
        }
        grid.claim(coord);
        log::debug!(target: "worldgen", "generated chunk ({}, {})", coord.cx, coord.cz);
    }

    /// Same cells as [`generate_chunk`](Self::generate_chunk), into a fresh buffer.
    pub fn generate_columns(&self, coord: ChunkCoord) -> ChunkColumns {
        let mut out = ChunkColumns::new(coord);
        let (ox, oz) = coord.origin();
        for lz in 0..CHUNK_SIZE {
            for lx in 0..CHUNK_SIZE {
                self.fill_column(ox + lx as i32, oz + lz as i32, out.column_mut(lx, lz));
            }
        }
        out
    }
}
