use crate::vertex::Vertex;

/// Doubled quad center `(y, x, z)`, independent of the triangulation diagonal.
#[inline]
pub fn face_center_key(face: &[Vertex; 6]) -> (u32, u32, u32) {
    let mut lo = [u16::MAX; 3];
    let mut hi = [0u16; 3];
    for v in face {
        for a in 0..3 {
            lo[a] = lo[a].min(v.position[a]);
            hi[a] = hi[a].max(v.position[a]);
        }
    }
    let sum = |a: usize| u32::from(lo[a]) + u32::from(hi[a]);
    (sum(1), sum(0), sum(2))
}

/// Stable in-place sort of whole faces by center, ascending Y then X then Z.
/// Gives a fixed draw order inside one alpha mesh; ordering between chunks
/// happens per frame by camera distance.
pub fn sort_alpha_faces(vertices: &mut [Vertex]) {
    debug_assert_eq!(vertices.len() % 6, 0);
    let faces: &mut [[Vertex; 6]] = bytemuck::cast_slice_mut(vertices);
    faces.sort_by_key(face_center_key);
}
