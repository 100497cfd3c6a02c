use std::collections::HashMap;

use voxmap_blocks::{AtlasLayout, BlockRegistry, BlockState, Density};
use voxmap_chunk::ChunkSnapshot;
use voxmap_mesh_cpu::{
    ChunkMeshCpu, MeshScratch, RenderState, Vertex, build_chunk_mesh, face_center_key,
};
use voxmap_world::{
    BlockSource, CHUNK_SIZE, ChunkCoord, TerrainGenerator, WorldGenParams, WorldGrid,
};

#[derive(Default)]
struct Sparse {
    cells: HashMap<(i32, i32, i32), BlockState>,
}

impl Sparse {
    fn put(&mut self, reg: &BlockRegistry, name: &str, p: (i32, i32, i32)) {
        let id = reg.id_by_name(name).unwrap();
        self.cells.insert(p, BlockState::new(id));
    }
}

impl BlockSource for Sparse {
    fn block(&self, wx: i32, wy: i32, wz: i32) -> BlockState {
        self.cells
            .get(&(wx, wy, wz))
            .copied()
            .unwrap_or(BlockState::SKY)
    }
}

fn mesh(src: &dyn BlockSource, coord: ChunkCoord, reg: &BlockRegistry) -> ChunkMeshCpu {
    let mut scratch = MeshScratch::new();
    build_chunk_mesh(src, coord, reg, &AtlasLayout::default(), &mut scratch)
}

fn terrain_grid(seed: u64, reg: &BlockRegistry) -> WorldGrid {
    let tg = TerrainGenerator::new(seed, WorldGenParams::default(), reg).unwrap();
    let mut grid = WorldGrid::new(2);
    for cz in -1..1 {
        for cx in -1..1 {
            tg.generate_chunk(&mut grid, ChunkCoord::new(cx, cz));
        }
    }
    grid
}

fn all_vertices(m: &ChunkMeshCpu) -> Vec<Vertex> {
    let mut out: Vec<Vertex> = m
        .opaque_meshes()
        .flat_map(|mesh| mesh.vertices.iter().copied())
        .collect();
    if let Some(a) = &m.alpha {
        out.extend(a.vertices.iter().copied());
    }
    out
}

/// Outward normal of a face from its first triangle's winding.
fn face_normal(face: &[Vertex]) -> (i32, i32, i32) {
    let p = |i: usize| {
        let v = face[i].position;
        (i32::from(v[0]), i32::from(v[1]), i32::from(v[2]))
    };
    let (a, b, c) = (p(0), p(1), p(2));
    let e1 = (b.0 - a.0, b.1 - a.1, b.2 - a.2);
    let e2 = (c.0 - a.0, c.1 - a.1, c.2 - a.2);
    let n = (
        e1.1 * e2.2 - e1.2 * e2.1,
        e1.2 * e2.0 - e1.0 * e2.2,
        e1.0 * e2.1 - e1.1 * e2.0,
    );
    (n.0.signum(), n.1.signum(), n.2.signum())
}

#[test]
fn all_air_chunk_has_no_geometry() {
    let reg = BlockRegistry::builtin();
    let m = mesh(&Sparse::default(), ChunkCoord::new(0, 0), &reg);
    assert!(m.is_empty());
    assert_eq!(m.opaque_vertex_count(), 0);
    assert_eq!(m.alpha_vertex_count(), 0);
}

#[test]
fn lone_block_yields_36_opaque_vertices() {
    let reg = BlockRegistry::builtin();
    let mut w = Sparse::default();
    w.put(&reg, "stone", (5, 40, 5));
    let m = mesh(&w, ChunkCoord::new(0, 0), &reg);
    assert_eq!(m.opaque_vertex_count(), 36);
    assert_eq!(m.alpha_vertex_count(), 0);
    assert!(m.slices[1].is_some());
    assert_eq!(m.opaque_meshes().count(), 1);
    let slice = m.slices[1].as_ref().unwrap();
    assert_eq!(slice.render, RenderState::Opaque);
    assert_eq!(slice.face_count(), 6);
    // open sky on every side
    assert!(slice.vertices.iter().all(|v| v.color[3] == 255));
}

#[test]
fn lone_block_in_negative_chunk_uses_local_positions() {
    let reg = BlockRegistry::builtin();
    let mut w = Sparse::default();
    w.put(&reg, "stone", (-1, 0, -32));
    let coord = ChunkCoord::new(-1, -1);
    let m = mesh(&w, coord, &reg);
    assert_eq!(m.opaque_vertex_count(), 36);
    let slice = m.slices[0].as_ref().unwrap();
    assert_eq!(slice.origin, [-32, 0, -32]);
    for v in slice.vertices.iter() {
        assert!(v.position[0] == 31 || v.position[0] == 32);
        assert!(v.position[2] <= 1);
    }
    assert_eq!(slice.bbox.min.x, -1.0);
    assert_eq!(slice.bbox.max.z, -31.0);
}

#[test]
fn alpha_blocks_go_to_alpha_mesh() {
    let reg = BlockRegistry::builtin();
    let mut w = Sparse::default();
    w.put(&reg, "glass", (1, 1, 1));
    let m = mesh(&w, ChunkCoord::new(0, 0), &reg);
    assert_eq!(m.opaque_vertex_count(), 0);
    assert_eq!(m.alpha_vertex_count(), 36);
    assert_eq!(
        m.alpha.as_ref().unwrap().render,
        RenderState::Alpha {
            double_sided: false
        }
    );

    w.put(&reg, "water", (10, 1, 10));
    let m = mesh(&w, ChunkCoord::new(0, 0), &reg);
    assert_eq!(m.alpha_vertex_count(), 72);
    assert_eq!(
        m.alpha.as_ref().unwrap().render,
        RenderState::Alpha { double_sided: true }
    );
}

#[test]
fn shared_faces_are_culled() {
    let reg = BlockRegistry::builtin();
    let mut w = Sparse::default();
    w.put(&reg, "stone", (4, 4, 4));
    w.put(&reg, "stone", (5, 4, 4));
    let m = mesh(&w, ChunkCoord::new(0, 0), &reg);
    assert_eq!(m.opaque_vertex_count(), 60);
}

#[test]
fn liquid_shows_against_air_not_solid() {
    let reg = BlockRegistry::builtin();
    let mut w = Sparse::default();
    w.put(&reg, "stone", (4, 4, 4));
    w.put(&reg, "water", (5, 4, 4));
    let m = mesh(&w, ChunkCoord::new(0, 0), &reg);
    // stone keeps all six faces because water is less dense
    assert_eq!(m.opaque_vertex_count(), 36);
    assert_eq!(m.alpha_vertex_count(), 30);
}

#[test]
fn neighbor_chunk_blocks_cull_border_faces() {
    let reg = BlockRegistry::builtin();
    let mut w = Sparse::default();
    w.put(&reg, "stone", (31, 4, 4));
    w.put(&reg, "stone", (32, 4, 4));
    let m = mesh(&w, ChunkCoord::new(0, 0), &reg);
    assert_eq!(m.opaque_vertex_count(), 30);
}

#[test]
fn shaded_corner_is_darker() {
    let reg = BlockRegistry::builtin();
    let mut w = Sparse::default();
    w.put(&reg, "stone", (4, 4, 4));
    // a dark overhang above one corner of the top face
    w.cells.insert((5, 5, 5), BlockState::new(2));
    let m = mesh(&w, ChunkCoord::new(0, 0), &reg);
    let slice = m.slices[0].as_ref().unwrap();
    let top: Vec<&Vertex> = slice.vertices.iter().filter(|v| v.position[1] == 5).collect();
    assert!(top.iter().any(|v| v.color[3] < 255));
    // the (4, 5, 5) corner drops the overhang cell from its taps
    let bright_corner = top
        .iter()
        .find(|v| v.position[0] == 4 && v.position[2] == 5)
        .unwrap();
    assert_eq!(bright_corner.color[3], 255);
    let dark_corner = top
        .iter()
        .find(|v| v.position[0] == 5 && v.position[2] == 5 && v.position[1] == 5)
        .unwrap();
    assert!(dark_corner.color[3] < bright_corner.color[3]);
}

#[test]
fn remesh_is_idempotent() {
    let reg = BlockRegistry::builtin();
    let grid = terrain_grid(1234, &reg);
    let c = ChunkCoord::new(-1, 0);
    let a = mesh(&grid, c, &reg);
    let b = mesh(&grid, c, &reg);
    assert!(!a.is_empty());
    assert_eq!(all_vertices(&a), all_vertices(&b));
}

#[test]
fn snapshot_and_grid_mesh_identically() {
    let reg = BlockRegistry::builtin();
    let grid = terrain_grid(42, &reg);
    let c = ChunkCoord::new(0, -1);
    let snap = ChunkSnapshot::capture(&grid, c);
    let a = mesh(&grid, c, &reg);
    let b = mesh(&snap, c, &reg);
    assert_eq!(all_vertices(&a), all_vertices(&b));
    for cy in 0..a.slices.len() {
        assert_eq!(a.slices[cy].is_some(), b.slices[cy].is_some());
    }
}

#[test]
fn scratch_is_reusable_across_chunks() {
    let reg = BlockRegistry::builtin();
    let grid = terrain_grid(8, &reg);
    let atlas = AtlasLayout::default();
    let mut shared = MeshScratch::new();
    for c in [ChunkCoord::new(-1, -1), ChunkCoord::new(0, 0)] {
        let reused = build_chunk_mesh(&grid, c, &reg, &atlas, &mut shared);
        let fresh = mesh(&grid, c, &reg);
        assert_eq!(all_vertices(&reused), all_vertices(&fresh));
    }
}

#[test]
fn every_face_separates_denser_from_lighter() {
    let reg = BlockRegistry::builtin();
    let grid = terrain_grid(77, &reg);
    let c = ChunkCoord::new(0, 0);
    let m = mesh(&grid, c, &reg);
    let (ox, oz) = c.origin();
    for face in all_vertices(&m).chunks(6) {
        let n = face_normal(face);
        let min = |a: usize| face.iter().map(|v| i32::from(v.position[a])).min().unwrap();
        let mut cell = (ox + min(0), min(1), oz + min(2));
        if n.0 > 0 {
            cell.0 -= 1;
        }
        if n.1 > 0 {
            cell.1 -= 1;
        }
        if n.2 > 0 {
            cell.2 -= 1;
        }
        let front = (cell.0 + n.0, cell.1 + n.1, cell.2 + n.2);
        let here = reg.density(grid.block(cell.0, cell.1, cell.2).block_type());
        let there = reg.density(grid.block(front.0, front.1, front.2).block_type());
        assert!(here > there, "face at {cell:?} normal {n:?}");
        assert_ne!(here, Density::None);
    }
}

#[test]
fn alpha_faces_are_center_sorted() {
    let reg = BlockRegistry::builtin();
    let mut w = Sparse::default();
    for (i, p) in [(9, 3, 2), (1, 7, 1), (4, 3, 30), (4, 3, 1)].into_iter().enumerate() {
        w.put(&reg, if i % 2 == 0 { "glass" } else { "water" }, p);
    }
    let m = mesh(&w, ChunkCoord::new(0, 0), &reg);
    let alpha = m.alpha.unwrap();
    let faces: Vec<[Vertex; 6]> = alpha
        .vertices
        .chunks(6)
        .map(|f| [f[0], f[1], f[2], f[3], f[4], f[5]])
        .collect();
    for pair in faces.windows(2) {
        assert!(face_center_key(&pair[0]) <= face_center_key(&pair[1]));
    }
}

#[test]
#[should_panic(expected = "mesh scratch overflow in chunk (0, 0)")]
fn scratch_overflow_is_fatal() {
    let reg = BlockRegistry::builtin();
    let mut w = Sparse::default();
    w.put(&reg, "stone", (0, 0, 0));
    let mut scratch = MeshScratch::with_limits(30, 30);
    build_chunk_mesh(
        &w,
        ChunkCoord::new(0, 0),
        &reg,
        &AtlasLayout::default(),
        &mut scratch,
    );
}

#[test]
fn positions_stay_inside_the_column() {
    let reg = BlockRegistry::builtin();
    let grid = terrain_grid(3, &reg);
    let m = mesh(&grid, ChunkCoord::new(-1, -1), &reg);
    for v in all_vertices(&m) {
        assert!(usize::from(v.position[0]) <= CHUNK_SIZE);
        assert!(usize::from(v.position[2]) <= CHUNK_SIZE);
        assert!(usize::from(v.position[1]) <= voxmap_world::CHUNK_HEIGHT);
        assert_eq!(v.position[3], 0);
    }
}
