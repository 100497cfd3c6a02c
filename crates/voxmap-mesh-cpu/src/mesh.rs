use std::sync::Arc;

use voxmap_geom::{Aabb, Vec3};
use voxmap_world::{CHUNK_VERTICAL_COUNT, ChunkCoord};

use crate::vertex::Vertex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderState {
    Opaque,
    Alpha { double_sided: bool },
}

/// Immutable vertex buffer ready for upload. Positions are relative to `origin`.
#[derive(Clone, Debug)]
pub struct Mesh {
    pub vertices: Arc<[Vertex]>,
    pub render: RenderState,
    pub origin: [i32; 3],
    pub bbox: Aabb,
}

impl Mesh {
    pub fn new(vertices: &[Vertex], render: RenderState, origin: [i32; 3]) -> Self {
        let bbox = bounds_of(vertices, origin);
        Self {
            vertices: Arc::from(vertices),
            render,
            origin,
            bbox,
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.vertices.len() / 6
    }

    /// Raw bytes in upload layout.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// World-space bounds of a vertex list.
fn bounds_of(vertices: &[Vertex], origin: [i32; 3]) -> Aabb {
    let mut lo = [u16::MAX; 3];
    let mut hi = [0u16; 3];
    for v in vertices {
        for a in 0..3 {
            lo[a] = lo[a].min(v.position[a]);
            hi[a] = hi[a].max(v.position[a]);
        }
    }
    if vertices.is_empty() {
        lo = [0; 3];
    }
    let o = Vec3::new(origin[0] as f32, origin[1] as f32, origin[2] as f32);
    Aabb::new(
        o + Vec3::new(f32::from(lo[0]), f32::from(lo[1]), f32::from(lo[2])),
        o + Vec3::new(f32::from(hi[0]), f32::from(hi[1]), f32::from(hi[2])),
    )
}

/// Meshes for one chunk column: an opaque mesh per non-empty slice plus one
/// alpha mesh.
#[derive(Clone, Debug)]
pub struct ChunkMeshCpu {
    pub coord: ChunkCoord,
    pub slices: [Option<Mesh>; CHUNK_VERTICAL_COUNT],
    pub alpha: Option<Mesh>,
}

impl ChunkMeshCpu {
    pub fn empty(coord: ChunkCoord) -> Self {
        Self {
            coord,
            slices: Default::default(),
            alpha: None,
        }
    }

    /// True when no geometry was produced.
    pub fn is_empty(&self) -> bool {
        self.alpha.is_none() && self.slices.iter().all(Option::is_none)
    }

    pub fn opaque_meshes(&self) -> impl Iterator<Item = &Mesh> {
        self.slices.iter().flatten()
    }

    pub fn opaque_vertex_count(&self) -> usize {
        self.opaque_meshes().map(Mesh::vertex_count).sum()
    }

    pub fn alpha_vertex_count(&self) -> usize {
        self.alpha.as_ref().map_or(0, Mesh::vertex_count)
    }
}
