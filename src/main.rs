use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use voxmap::geom::{Frustum, Vec3};
use voxmap::world::ChunkCoord;
use voxmap::{EngineConfig, SystemClock, WorldState};

/// Headless streaming driver: flies a camera along +X and reports what the
/// engine loads, meshes and would draw.
#[derive(Parser, Debug)]
#[command(name = "voxmap", version, about)]
struct Args {
    /// Engine config TOML
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// World seed; overrides the config
    #[arg(long)]
    seed: Option<u64>,

    /// View distance in chunks; overrides the config
    #[arg(long)]
    view_distance: Option<usize>,

    /// Background workers; overrides the config
    #[arg(long)]
    workers: Option<usize>,

    /// Frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Camera speed in blocks per frame
    #[arg(long, default_value_t = 0.5)]
    speed: f32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::load_from_path(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.world.seed = Some(seed);
    }
    if let Some(vd) = args.view_distance {
        config.world.view_distance = vd;
    }
    if let Some(workers) = args.workers {
        config.streaming.workers = workers;
    }
    config.validate().context("invalid engine config")?;

    let registry = config.registry().context("loading block registry")?;
    let mut world = WorldState::init_world(
        &config,
        registry,
        ChunkCoord::new(0, 0),
        Box::new(SystemClock::new()),
    )
    .context("initializing world")?;

    let mut camera = world.camera();
    let forward = Vec3::new(1.0, -0.2, 0.0);
    for frame in 0..args.frames {
        camera.x += args.speed;
        world.tick(camera);
        if frame % 60 == 0 {
            let s = world.stats();
            log::info!(
                "frame {frame}: center {:?}, resident {}, dirty {}, generating {}, building {}, jobs {}+{}, last tick {:?}",
                s.center.map(|c| (c.cx, c.cz)),
                s.resident,
                s.dirty,
                s.generating,
                s.building,
                s.queued_jobs,
                s.inflight_jobs,
                s.last_tick
            );
        }
    }
    world.settle();

    let frustum = Frustum::from_camera(camera, forward, Vec3::UP, 70.0, 16.0 / 9.0, 0.1, 512.0);
    let (mut draws, mut vertices) = (0usize, 0usize);
    world.for_each_visible_mesh(&frustum, |_, mesh| {
        draws += 1;
        vertices += mesh.vertex_count();
    });
    let alpha = world.sorted_alpha_meshes(&frustum);
    log::info!(
        "visible: {draws} opaque draw(s), {vertices} vertices, {} alpha mesh(es)",
        alpha.len()
    );

    let down = Vec3::new(0.0, -1.0, 0.0);
    match world.raycast(camera, down, 256.0) {
        Some(hit) => {
            let (x, y, z) = hit.before();
            let stone = world.registry().id_by_name("stone").unwrap_or(1);
            let placed = world.set_block(x, y, z, stone);
            log::info!(
                "ray down hit {:?} ({}); placed stone at {:?}: {placed}",
                hit.hit(),
                world
                    .registry()
                    .get(world.query_block(hit.bx, hit.by, hit.bz).block_type())
                    .map_or("?", |b| b.name.as_str()),
                hit.before()
            );
            world.settle();
        }
        None => log::info!("ray down from {camera:?} hit nothing"),
    }
    Ok(())
}
