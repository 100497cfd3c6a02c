use voxmap_blocks::BlockState;
use voxmap_world::{BlockSource, CHUNK_HEIGHT, CHUNK_SIZE, ChunkCoord};

const BORDER: usize = 1;

/// Worker-local copy of one chunk column plus a one-cell border on X and Z.
///
/// Everything the mesher reads for `coord` lies inside this box, so a job can
/// run against it while the live grid keeps changing.
#[derive(Clone, Debug)]
pub struct ChunkSnapshot {
    pub coord: ChunkCoord,
    pub sx: usize,
    pub sy: usize,
    pub sz: usize,
    pub blocks: Vec<BlockState>,
}

impl ChunkSnapshot {
    pub fn capture<S: BlockSource + ?Sized>(source: &S, coord: ChunkCoord) -> Self {
        let sx = CHUNK_SIZE + 2 * BORDER;
        let sy = CHUNK_HEIGHT;
        let sz = CHUNK_SIZE + 2 * BORDER;
        let (ox, oz) = coord.origin();
        let (bx, bz) = (ox - BORDER as i32, oz - BORDER as i32);
        let mut blocks = Vec::with_capacity(sx * sy * sz);
        for y in 0..sy {
            for z in 0..sz {
                for x in 0..sx {
                    blocks.push(source.block(bx + x as i32, y as i32, bz + z as i32));
                }
            }
        }
        Self {
            coord,
            sx,
            sy,
            sz,
            blocks,
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (y * self.sz + z) * self.sx + x
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> BlockState {
        self.blocks[self.idx(x, y, z)]
    }

    #[inline]
    pub fn contains_world(&self, wx: i32, wy: i32, wz: i32) -> bool {
        let (ox, oz) = self.coord.origin();
        let (bx, bz) = (ox - BORDER as i32, oz - BORDER as i32);
        wy >= 0
            && wy < self.sy as i32
            && wx >= bx
            && wx < bx + self.sx as i32
            && wz >= bz
            && wz < bz + self.sz as i32
    }

    #[inline]
    pub fn get_world(&self, wx: i32, wy: i32, wz: i32) -> Option<BlockState> {
        if !self.contains_world(wx, wy, wz) {
            return None;
        }
        let (ox, oz) = self.coord.origin();
        let lx = (wx - ox + BORDER as i32) as usize;
        let lz = (wz - oz + BORDER as i32) as usize;
        Some(self.get_local(lx, wy as usize, lz))
    }
}

impl BlockSource for ChunkSnapshot {
    #[inline]
    fn block(&self, wx: i32, wy: i32, wz: i32) -> BlockState {
        self.get_world(wx, wy, wz).unwrap_or(BlockState::SKY)
    }
}
