use voxmap_world::{CHUNK_CELLS, CHUNK_SIZE, ChunkCoord};

use crate::vertex::Vertex;

/// Worst case for one slice: every cell showing all six faces.
pub const MAX_SLICE_VERTICES: usize = 36 * CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE;
/// Worst case for the alpha buffer, which spans the whole column.
pub const MAX_ALPHA_VERTICES: usize = 36 * CHUNK_CELLS;

/// Reusable tessellation arena. One per thread; reset between chunks.
///
/// Buffers grow on demand up to their limits and keep their allocation across
/// resets. Exceeding a limit means the size constants no longer match the
/// chunk dimensions and is treated as fatal.
pub struct MeshScratch {
    pub(crate) opaque: Vec<Vertex>,
    pub(crate) alpha: Vec<Vertex>,
    pub(crate) alpha_double_sided: bool,
    pub(crate) column_tops: Vec<u16>,
    opaque_limit: usize,
    alpha_limit: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Target {
    Opaque,
    Alpha,
}

impl Default for MeshScratch {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshScratch {
    pub fn new() -> Self {
        Self::with_limits(MAX_SLICE_VERTICES, MAX_ALPHA_VERTICES)
    }

    pub fn with_limits(opaque_limit: usize, alpha_limit: usize) -> Self {
        Self {
            opaque: Vec::new(),
            alpha: Vec::new(),
            alpha_double_sided: false,
            column_tops: vec![0; CHUNK_SIZE * CHUNK_SIZE],
            opaque_limit,
            alpha_limit,
        }
    }

    pub fn reset(&mut self) {
        self.opaque.clear();
        self.alpha.clear();
        self.alpha_double_sided = false;
        self.column_tops.fill(0);
    }

    #[inline]
    pub(crate) fn begin_slice(&mut self) {
        self.opaque.clear();
    }

    /// Vertices currently reserved across both buffers.
    pub fn capacity(&self) -> usize {
        self.opaque.capacity() + self.alpha.capacity()
    }

    #[inline]
    pub(crate) fn push_face(&mut self, target: Target, coord: ChunkCoord, quad: &[Vertex; 6]) {
        let (buf, limit) = match target {
            Target::Opaque => (&mut self.opaque, self.opaque_limit),
            Target::Alpha => (&mut self.alpha, self.alpha_limit),
        };
        if buf.len() + quad.len() > limit {
            panic!(
                "mesh scratch overflow in chunk ({}, {}): {:?} buffer holds {} vertices, limit {}",
                coord.cx,
                coord.cz,
                target,
                buf.len(),
                limit
            );
        }
        buf.extend_from_slice(quad);
    }
}
