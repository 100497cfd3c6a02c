use voxmap_geom::Vec3;
use voxmap_mesh_cpu::Mesh;
use voxmap_world::{CHUNK_HEIGHT, CHUNK_SIZE, ChunkCoord};

/// A mesh selected for drawing, with its sort distance.
#[derive(Clone, Copy, Debug)]
pub struct DrawItem<'a> {
    pub coord: ChunkCoord,
    pub mesh: &'a Mesh,
    pub distance_sq: f32,
}

/// Center of a chunk column in world space.
pub fn chunk_center(coord: ChunkCoord) -> Vec3 {
    let (ox, oz) = coord.origin();
    let half = CHUNK_SIZE as f32 * 0.5;
    Vec3::new(
        ox as f32 + half,
        CHUNK_HEIGHT as f32 * 0.5,
        oz as f32 + half,
    )
}

/// Nearest first. Stable, so equal distances keep their input order.
pub fn sort_front_to_back(items: &mut [DrawItem<'_>]) {
    items.sort_by(|a, b| a.distance_sq.total_cmp(&b.distance_sq));
}

/// Farthest first. Stable, so equal distances keep their input order.
pub fn sort_back_to_front(items: &mut [DrawItem<'_>]) {
    items.sort_by(|a, b| b.distance_sq.total_cmp(&a.distance_sq));
}
