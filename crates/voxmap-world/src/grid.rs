use voxmap_blocks::{BlockId, BlockState};
use voxmap_lighting::relight_column;

use crate::{BlockSource, CHUNK_CELLS, CHUNK_HEIGHT, CHUNK_SIZE, ChunkCoord};

/// Dense toroidal window of block cells.
///
/// Holds `(width_chunks * 32)^2` columns of `CHUNK_HEIGHT` cells. World X/Z
/// wrap onto the buffer with `rem_euclid`, so a physical column is reused
/// whenever the window slides. Cells of one column are contiguous, lowest Y first.
pub struct WorldGrid {
    width_chunks: usize,
    span: usize,
    cells: Vec<BlockState>,
    residents: Vec<Option<ChunkCoord>>,
}

impl WorldGrid {
    pub fn new(width_chunks: usize) -> Self {
        assert!(width_chunks > 0, "world grid needs at least one chunk");
        let span = width_chunks * CHUNK_SIZE;
        Self {
            width_chunks,
            span,
            cells: vec![BlockState::SKY; span * span * CHUNK_HEIGHT],
            residents: vec![None; width_chunks * width_chunks],
        }
    }

    #[inline]
    pub fn width_chunks(&self) -> usize {
        self.width_chunks
    }

    /// Edge length of the window in blocks.
    #[inline]
    pub fn span(&self) -> usize {
        self.span
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Physical slot a chunk coordinate maps onto.
    #[inline]
    pub fn slot_index(&self, coord: ChunkCoord) -> usize {
        let w = self.width_chunks as i32;
        coord.cz.rem_euclid(w) as usize * self.width_chunks + coord.cx.rem_euclid(w) as usize
    }

    /// Chunk whose data currently occupies the slot `coord` maps onto.
    #[inline]
    pub fn occupant(&self, coord: ChunkCoord) -> Option<ChunkCoord> {
        self.residents[self.slot_index(coord)]
    }

    #[inline]
    pub fn is_resident(&self, coord: ChunkCoord) -> bool {
        self.occupant(coord) == Some(coord)
    }

    /// Records that the slot now holds `coord`'s data.
    pub fn claim(&mut self, coord: ChunkCoord) {
        let slot = self.slot_index(coord);
        self.residents[slot] = Some(coord);
    }

    /// Marks the slot as holding nothing readable, e.g. while a worker refills it.
    pub fn release(&mut self, coord: ChunkCoord) {
        let slot = self.slot_index(coord);
        self.residents[slot] = None;
    }

    #[inline]
    fn column_base(&self, wx: i32, wz: i32) -> usize {
        let span = self.span as i32;
        let lx = wx.rem_euclid(span) as usize;
        let lz = wz.rem_euclid(span) as usize;
        (lz * self.span + lx) * CHUNK_HEIGHT
    }

    #[inline]
    fn column_is_resident(&self, wx: i32, wz: i32) -> bool {
        self.is_resident(ChunkCoord::containing_block(wx, wz))
    }

    /// Cell at a world position, or [`BlockState::SKY`] when out of height or
    /// not resident.
    #[inline]
    pub fn get(&self, wx: i32, wy: i32, wz: i32) -> BlockState {
        if wy < 0 || wy >= CHUNK_HEIGHT as i32 || !self.column_is_resident(wx, wz) {
            return BlockState::SKY;
        }
        self.cells[self.column_base(wx, wz) + wy as usize]
    }

    /// Raw column storage for `(wx, wz)` regardless of residency.
    pub fn column(&self, wx: i32, wz: i32) -> &[BlockState] {
        let base = self.column_base(wx, wz);
        &self.cells[base..base + CHUNK_HEIGHT]
    }

    pub(crate) fn column_mut(&mut self, wx: i32, wz: i32) -> &mut [BlockState] {
        let base = self.column_base(wx, wz);
        debug_assert!(base + CHUNK_HEIGHT <= self.cells.len());
        &mut self.cells[base..base + CHUNK_HEIGHT]
    }

    /// The single mutation entry point for resident cells. Rewrites the cell
    /// and re-derives the column's sunlight. Returns false, changing nothing,
    /// when the position is out of height or not resident.
    pub fn set_block(&mut self, wx: i32, wy: i32, wz: i32, ty: BlockId) -> bool {
        if wy < 0 || wy >= CHUNK_HEIGHT as i32 || !self.column_is_resident(wx, wz) {
            return false;
        }
        let column = self.column_mut(wx, wz);
        column[wy as usize] = BlockState::new(ty);
        relight_column(column);
        true
    }

    /// Copies a generated chunk into its slot and marks it resident.
    pub fn install(&mut self, chunk: &ChunkColumns) {
        let (ox, oz) = chunk.coord.origin();
        for lz in 0..CHUNK_SIZE {
            for lx in 0..CHUNK_SIZE {
                let src = chunk.column(lx, lz);
                self.column_mut(ox + lx as i32, oz + lz as i32)
                    .copy_from_slice(src);
            }
        }
        self.claim(chunk.coord);
    }
}

impl BlockSource for WorldGrid {
    #[inline]
    fn block(&self, wx: i32, wy: i32, wz: i32) -> BlockState {
        self.get(wx, wy, wz)
    }
}

/// One chunk column of cells generated away from the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkColumns {
    pub coord: ChunkCoord,
    pub cells: Vec<BlockState>,
}

impl ChunkColumns {
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            cells: vec![BlockState::SKY; CHUNK_CELLS],
        }
    }

    #[inline]
    fn base(lx: usize, lz: usize) -> usize {
        debug_assert!(lx < CHUNK_SIZE && lz < CHUNK_SIZE);
        (lz * CHUNK_SIZE + lx) * CHUNK_HEIGHT
    }

    pub fn column(&self, lx: usize, lz: usize) -> &[BlockState] {
        let base = Self::base(lx, lz);
        &self.cells[base..base + CHUNK_HEIGHT]
    }

    pub fn column_mut(&mut self, lx: usize, lz: usize) -> &mut [BlockState] {
        let base = Self::base(lx, lz);
        &mut self.cells[base..base + CHUNK_HEIGHT]
    }

    #[inline]
    pub fn get_local(&self, lx: usize, y: usize, lz: usize) -> BlockState {
        self.cells[Self::base(lx, lz) + y]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stone_floor(coord: ChunkCoord) -> ChunkColumns {
        let mut c = ChunkColumns::new(coord);
        for lz in 0..CHUNK_SIZE {
            for lx in 0..CHUNK_SIZE {
                let col = c.column_mut(lx, lz);
                col[0] = BlockState::new(2);
                relight_column(col);
            }
        }
        c
    }

    #[test]
    fn wraps_onto_the_same_slot() {
        let g = WorldGrid::new(4);
        assert_eq!(
            g.slot_index(ChunkCoord::new(1, 2)),
            g.slot_index(ChunkCoord::new(5, -2))
        );
        assert_ne!(
            g.slot_index(ChunkCoord::new(1, 2)),
            g.slot_index(ChunkCoord::new(2, 2))
        );
    }

    #[test]
    fn unresident_reads_are_sky() {
        let g = WorldGrid::new(2);
        assert_eq!(g.get(0, 10, 0), BlockState::SKY);
        assert_eq!(g.get(0, -1, 0), BlockState::SKY);
        assert_eq!(g.get(0, CHUNK_HEIGHT as i32, 0), BlockState::SKY);
    }

    #[test]
    fn install_then_read_back() {
        let mut g = WorldGrid::new(2);
        let coord = ChunkCoord::new(-1, 3);
        g.install(&stone_floor(coord));
        assert!(g.is_resident(coord));
        let (ox, oz) = coord.origin();
        assert_eq!(g.get(ox + 5, 0, oz + 7).block_type(), 2);
        assert_eq!(g.get(ox + 5, 0, oz + 7).sunlight(), 0);
        assert_eq!(g.get(ox + 5, 1, oz + 7).sunlight(), 15);
        // the aliased coordinate shares storage but is not resident
        assert_eq!(g.get(ox + 5 + 64, 0, oz + 7), BlockState::SKY);
    }

    #[test]
    fn set_block_relights_column() {
        let mut g = WorldGrid::new(2);
        let coord = ChunkCoord::new(0, 0);
        g.install(&stone_floor(coord));
        assert!(g.set_block(3, 40, 3, 2));
        assert_eq!(g.get(3, 41, 3).sunlight(), 15);
        assert_eq!(g.get(3, 40, 3).sunlight(), 0);
        assert_eq!(g.get(3, 20, 3).sunlight(), 0);
        assert_eq!(g.get(4, 20, 3).sunlight(), 15);

        assert!(g.set_block(3, 40, 3, 0));
        assert_eq!(g.get(3, 20, 3).sunlight(), 15);
    }

    #[test]
    fn set_block_outside_window_is_noop() {
        let mut g = WorldGrid::new(2);
        g.install(&stone_floor(ChunkCoord::new(0, 0)));
        assert!(!g.set_block(100, 10, 0, 2));
        assert!(!g.set_block(0, -1, 0, 2));
        assert!(!g.set_block(0, CHUNK_HEIGHT as i32, 0, 2));
    }
}
