use proptest::prelude::*;
use voxmap_blocks::{AIR, BlockRegistry, BlockState};
use voxmap_world::{
    CHUNK_HEIGHT, CHUNK_SIZE, ChunkCoord, TerrainGenerator, WorldGenParams, WorldGrid,
};

fn generator(seed: u64) -> (TerrainGenerator, BlockRegistry) {
    let reg = BlockRegistry::builtin();
    let tg = TerrainGenerator::new(seed, WorldGenParams::default(), &reg).unwrap();
    (tg, reg)
}

fn column(tg: &TerrainGenerator, x: i32, z: i32) -> Vec<BlockState> {
    let mut col = vec![BlockState::SKY; CHUNK_HEIGHT];
    tg.fill_column(x, z, &mut col);
    col
}

#[test]
fn unknown_surface_block_is_rejected() {
    let reg = BlockRegistry::builtin();
    let params = WorldGenParams {
        surface_primary: "snow".to_string(),
        ..WorldGenParams::default()
    };
    assert!(TerrainGenerator::new(1, params, &reg).is_err());
}

#[test]
fn generate_chunk_matches_generate_columns() {
    let (tg, _) = generator(77);
    let coord = ChunkCoord::new(-3, 2);
    let mut grid = WorldGrid::new(2);
    tg.generate_chunk(&mut grid, coord);
    let cols = tg.generate_columns(coord);
    let (ox, oz) = coord.origin();
    for lz in [0usize, 7, 31] {
        for lx in [0usize, 15, 31] {
            for y in 0..CHUNK_HEIGHT {
                assert_eq!(
                    grid.get(ox + lx as i32, y as i32, oz + lz as i32),
                    cols.get_local(lx, y, lz)
                );
            }
        }
    }
}

#[test]
fn chunk_generation_is_bit_identical() {
    let (a, _) = generator(0xDEAD_BEEF);
    let (b, _) = generator(0xDEAD_BEEF);
    let coord = ChunkCoord::new(4, -9);
    assert_eq!(a.generate_columns(coord), b.generate_columns(coord));
    assert_eq!(a.generate_columns(coord), a.generate_columns(coord));
}

#[test]
fn different_seeds_differ() {
    let (a, _) = generator(1);
    let (b, _) = generator(2);
    let coord = ChunkCoord::new(0, 0);
    assert_ne!(a.generate_columns(coord), b.generate_columns(coord));
}

#[test]
fn surface_is_below_water_or_air() {
    let (tg, reg) = generator(5);
    let water = reg.id_by_name("water").unwrap();
    let dirt = reg.id_by_name("dirt").unwrap();
    let grass = reg.id_by_name("grass").unwrap();
    let sand = reg.id_by_name("sand").unwrap();
    for x in 0..CHUNK_SIZE as i32 {
        let col = column(&tg, x, 11);
        let top = (0..CHUNK_HEIGHT)
            .rev()
            .find(|&y| {
                let t = col[y].block_type();
                t != AIR && t != water
            })
            .unwrap();
        let t = col[top].block_type();
        assert!(t == grass || t == sand, "x={x} top={top} ty={t}");
        if top >= 3 {
            assert_eq!(col[top - 1].block_type(), dirt);
        }
    }
}

proptest! {
    #[test]
    fn sunlight_drops_at_first_block(seed in any::<u64>(), x in -4096i32..4096, z in -4096i32..4096) {
        let (tg, _) = generator(seed);
        let col = column(&tg, x, z);
        let first = (0..CHUNK_HEIGHT).rev().find(|&y| !col[y].is_air()).unwrap();
        for y in 0..CHUNK_HEIGHT {
            let want = if y > first { 15 } else { 0 };
            prop_assert_eq!(col[y].sunlight(), want);
        }
    }

    #[test]
    fn floor_and_ocean_layers(seed in any::<u64>(), x in -4096i32..4096, z in -4096i32..4096) {
        let (tg, reg) = generator(seed);
        let params = tg.params().clone();
        let col = column(&tg, x, z);
        let bedrock = reg.id_by_name("bedrock").unwrap();
        prop_assert_eq!(col[0].block_type(), bedrock);
        prop_assert_eq!(col[1].block_type(), bedrock);
        let height = tg.height_at(x, z);
        for y in 2..CHUNK_HEIGHT {
            let t = col[y].block_type();
            if (y as f64) >= height {
                if y as i32 <= params.ocean_level {
                    prop_assert_eq!(t, reg.id_by_name("water").unwrap());
                } else {
                    prop_assert_eq!(t, AIR);
                }
            } else {
                prop_assert_ne!(t, AIR);
            }
        }
    }
}
