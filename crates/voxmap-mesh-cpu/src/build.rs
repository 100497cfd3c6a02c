use voxmap_blocks::{AtlasLayout, BlockInfo, BlockRegistry, BlockState, Density, MAX_LIGHT};
use voxmap_lighting::{CORNER_TAPS, average_corner, corner_taps};
use voxmap_world::{BlockSource, CHUNK_HEIGHT, CHUNK_SIZE, CHUNK_VERTICAL_COUNT, ChunkCoord};

use crate::alpha::sort_alpha_faces;
use crate::face::{Face, QUAD_CORNERS};
use crate::mesh::{ChunkMeshCpu, Mesh, RenderState};
use crate::scratch::{MeshScratch, Target};
use crate::vertex::Vertex;

/// Tessellates one chunk column.
///
/// Emits a quad for every face whose neighbor has strictly lower density,
/// shaded from the seven front-layer cells around each corner. Output is a
/// pure function of the cells `source` returns for the chunk and its
/// one-cell border, so a live grid and a snapshot of it give identical meshes.
pub fn build_chunk_mesh<S: BlockSource + ?Sized>(
    source: &S,
    coord: ChunkCoord,
    reg: &BlockRegistry,
    atlas: &AtlasLayout,
    scratch: &mut MeshScratch,
) -> ChunkMeshCpu {
    scratch.reset();
    let (ox, oz) = coord.origin();
    let origin = [ox, 0, oz];
    let mut out = ChunkMeshCpu::empty(coord);

    scan_column_tops(source, ox, oz, &mut scratch.column_tops);

    for cy in 0..CHUNK_VERTICAL_COUNT {
        scratch.begin_slice();
        let y0 = cy * CHUNK_SIZE;
        for ly in 0..CHUNK_SIZE {
            let y = y0 + ly;
            for lz in 0..CHUNK_SIZE {
                for lx in 0..CHUNK_SIZE {
                    if y >= usize::from(scratch.column_tops[lz * CHUNK_SIZE + lx]) {
                        continue;
                    }
                    let (wx, wy, wz) = (ox + lx as i32, y as i32, oz + lz as i32);
                    let here = source.block(wx, wy, wz);
                    if here.is_air() {
                        continue;
                    }
                    let Some(info) = reg.get(here.block_type()) else {
                        continue;
                    };
                    if info.density == Density::None {
                        continue;
                    }
                    let target = if info.alpha {
                        Target::Alpha
                    } else {
                        Target::Opaque
                    };
                    for face in Face::ALL {
                        let (dx, dy, dz) = face.delta();
                        let nb = source.block(wx + dx, wy + dy, wz + dz);
                        if reg.density(nb.block_type()) >= info.density {
                            continue;
                        }
                        let quad = shade_face(
                            source,
                            info,
                            atlas,
                            face,
                            (wx, wy, wz),
                            (lx as i32, y as i32, lz as i32),
                        );
                        scratch.push_face(target, coord, &quad);
                        if target == Target::Alpha && info.backfaces {
                            scratch.alpha_double_sided = true;
                        }
                    }
                }
            }
        }
        if !scratch.opaque.is_empty() {
            out.slices[cy] = Some(Mesh::new(&scratch.opaque, RenderState::Opaque, origin));
        }
    }

    if !scratch.alpha.is_empty() {
        sort_alpha_faces(&mut scratch.alpha);
        out.alpha = Some(Mesh::new(
            &scratch.alpha,
            RenderState::Alpha {
                double_sided: scratch.alpha_double_sided,
            },
            origin,
        ));
    }

    log::debug!(
        target: "mesh",
        "meshed chunk ({}, {}): {} opaque + {} alpha vertices",
        coord.cx,
        coord.cz,
        out.opaque_vertex_count(),
        out.alpha_vertex_count()
    );
    out
}

/// Per column, one past the lowest cell that still needs a look. Cells above
/// it are open-sky air and cannot emit faces.
fn scan_column_tops<S: BlockSource + ?Sized>(source: &S, ox: i32, oz: i32, tops: &mut [u16]) {
    for lz in 0..CHUNK_SIZE {
        for lx in 0..CHUNK_SIZE {
            let (wx, wz) = (ox + lx as i32, oz + lz as i32);
            let mut top = 0;
            for y in (0..CHUNK_HEIGHT).rev() {
                let b = source.block(wx, y as i32, wz);
                if !(b.is_air() && b.sunlight() == MAX_LIGHT) {
                    top = y + 1;
                    break;
                }
            }
            tops[lz * CHUNK_SIZE + lx] = top as u16;
        }
    }
}

/// Builds the six vertices of one face, picking the triangulation diagonal
/// from the corner sunlight.
fn shade_face<S: BlockSource + ?Sized>(
    source: &S,
    info: &BlockInfo,
    atlas: &AtlasLayout,
    face: Face,
    world: (i32, i32, i32),
    local: (i32, i32, i32),
) -> [Vertex; 6] {
    let (dx, dy, dz) = face.delta();
    let front = (world.0 + dx, world.1 + dy, world.2 + dz);
    let (u, v) = face.tangents();
    let (u0, v0) = atlas.uv_origin(info.image(face.slot()));
    let (tu, tv) = atlas.tile_extent();

    let mut corners = [Vertex::default(); 4];
    for (k, (su, sv)) in QUAD_CORNERS.into_iter().enumerate() {
        let mut samples = [BlockState::SKY; CORNER_TAPS];
        for (s, (du, dv)) in samples.iter_mut().zip(corner_taps(su, sv)) {
            *s = source.block(
                front.0 + du * u.0 + dv * v.0,
                front.1 + du * u.1 + dv * v.1,
                front.2 + du * u.2 + dv * v.2,
            );
        }
        let color = average_corner(&samples);
        let off = face.corner_offset(su, sv);
        let (s, t) = face.tex_coord(su, sv);
        corners[k] = Vertex::new(
            (local.0 + off.0, local.1 + off.1, local.2 + off.2),
            (u0 + f32::from(s) * tu, v0 + f32::from(t) * tv),
            color,
        );
    }
    triangulate(corners)
}

/// Splits a quad along `a-c` when that pair is at least as bright as `b-d`.
#[inline]
pub fn triangulate([a, b, c, d]: [Vertex; 4]) -> [Vertex; 6] {
    let ac = u16::from(a.sun()) + u16::from(c.sun());
    let bd = u16::from(b.sun()) + u16::from(d.sun());
    if ac >= bd {
        [a, b, c, a, c, d]
    } else {
        [b, c, d, b, d, a]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner(sun: u8) -> Vertex {
        Vertex {
            color: [0, 0, 0, sun],
            position: [u16::from(sun), 0, 0, 0],
            ..Vertex::default()
        }
    }

    #[test]
    fn flips_toward_brighter_diagonal() {
        let q = [corner(10), corner(200), corner(10), corner(200)];
        let tri = triangulate(q);
        assert_eq!(tri[0], q[1]);
        assert_eq!(tri[5], q[0]);

        let q = [corner(200), corner(10), corner(200), corner(10)];
        let tri = triangulate(q);
        assert_eq!(tri, [q[0], q[1], q[2], q[0], q[2], q[3]]);
    }

    #[test]
    fn ties_keep_a_c_diagonal() {
        let q = [corner(50), corner(60), corner(70), corner(60)];
        let tri = triangulate(q);
        assert_eq!(tri[0], q[0]);
        assert_eq!(tri[2], q[2]);
    }
}
