use std::sync::Arc;
use std::time::Duration;

use hashbrown::HashSet;
use thiserror::Error;
use voxmap_blocks::{AtlasLayout, BlockId, BlockRegistry, BlockState};
use voxmap_chunk::{ChunkCache, ChunkSlot, ChunkSnapshot, GenState, MeshInstall, MeshState};
use voxmap_geom::{Frustum, Vec3};
use voxmap_mesh_cpu::{ChunkMeshCpu, Mesh, MeshScratch, build_chunk_mesh};
use voxmap_runtime::{Job, JobOut, Runtime, ThreadPoolBuildError};
use voxmap_world::{CHUNK_SIZE, ChunkCoord, TerrainGenerator, WorldGenConfigError, WorldGrid};

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::raycast::{RayHit, raycast_first_hit};
use crate::visibility::{DrawItem, chunk_center, sort_back_to_front, sort_front_to_back};

#[derive(Debug, Error)]
pub enum InitError {
    #[error("view distance must be at least 1 chunk")]
    ViewDistance,
    #[error(transparent)]
    WorldGen(#[from] WorldGenConfigError),
    #[error("failed to start worker pool: {0}")]
    Workers(#[from] ThreadPoolBuildError),
}

/// What the last `tick` did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    pub reloaded: usize,
    pub results_applied: usize,
    pub meshed: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub center: Option<ChunkCoord>,
    pub resident: usize,
    pub dirty: usize,
    pub generating: usize,
    pub building: usize,
    pub queued_jobs: usize,
    pub inflight_jobs: usize,
    pub last_tick: TickStats,
}

/// The whole engine core: block grid, chunk cache and the meshing pipeline
/// around one moving viewpoint.
///
/// All grid and cache mutation happens on the thread that owns this value.
/// With workers enabled, generation and tessellation run in the background
/// and their results are applied during [`WorldState::tick`].
pub struct WorldState {
    registry: Arc<BlockRegistry>,
    atlas: AtlasLayout,
    terrain: Arc<TerrainGenerator>,
    grid: WorldGrid,
    cache: ChunkCache<ChunkMeshCpu>,
    scratch: MeshScratch,
    runtime: Option<Runtime>,
    clock: Box<dyn Clock>,
    mesh_budget_ms: u64,
    camera: Vec3,
    next_job_id: u64,
    last_tick: TickStats,
}

impl WorldState {
    /// Builds the grid and cache, then generates and meshes the full window
    /// around `origin` before returning.
    pub fn init_world(
        config: &EngineConfig,
        registry: BlockRegistry,
        origin: ChunkCoord,
        clock: Box<dyn Clock>,
    ) -> Result<Self, InitError> {
        let view_distance = config.world.view_distance;
        if view_distance == 0 {
            return Err(InitError::ViewDistance);
        }
        let seed = config.resolve_seed();
        let registry = Arc::new(registry);
        let terrain = Arc::new(TerrainGenerator::new(
            seed,
            config.worldgen_params(),
            &registry,
        )?);
        let runtime = match config.streaming.workers {
            0 => None,
            n => Some(Runtime::new(
                n,
                terrain.clone(),
                registry.clone(),
                config.atlas,
            )?),
        };
        let width = view_distance * 2;
        let (ox, oz) = origin.origin();
        let half = CHUNK_SIZE as f32 * 0.5;

        let mut state = Self {
            registry,
            atlas: config.atlas,
            terrain,
            grid: WorldGrid::new(width),
            cache: ChunkCache::new(view_distance),
            scratch: MeshScratch::new(),
            runtime,
            clock,
            mesh_budget_ms: config.streaming.mesh_budget_ms,
            camera: Vec3::new(ox as f32 + half, 128.0, oz as f32 + half),
            next_job_id: 0,
            last_tick: TickStats::default(),
        };
        log::info!(
            target: "stream",
            "init world: seed {seed}, view distance {view_distance}, {} worker(s), origin ({}, {})",
            config.streaming.workers,
            origin.cx,
            origin.cz
        );
        state.shift_window(origin);
        state.settle();
        Ok(state)
    }

    /// Advances streaming for one frame: follows the camera across chunk
    /// boundaries, applies finished background work, then remeshes dirty
    /// chunks until the frame's budget runs out.
    pub fn tick(&mut self, camera: Vec3) {
        self.camera = camera;
        let mut stats = TickStats::default();
        let center = ChunkCoord::containing_point(camera.x, camera.z);
        if self.cache.center() != Some(center) {
            stats.reloaded = self.shift_window(center);
        }
        stats.results_applied = self.apply_results();
        stats.meshed = self.remesh_dirty(Some(self.mesh_budget_ms));
        self.last_tick = stats;
    }

    /// Cell at a world position; air with full sunlight outside the world
    /// height or the resident window.
    #[inline]
    pub fn query_block(&self, wx: i32, wy: i32, wz: i32) -> BlockState {
        self.grid.get(wx, wy, wz)
    }

    /// Replaces a resident cell and dirties every chunk whose mesh can see it.
    /// Returns false, changing nothing, outside the resident window or for an
    /// id the registry does not know.
    pub fn set_block(&mut self, wx: i32, wy: i32, wz: i32, ty: BlockId) -> bool {
        if self.registry.get(ty).is_none() {
            log::warn!(target: "edit", "rejected unknown block id {ty} at ({wx}, {wy}, {wz})");
            return false;
        }
        if !self.grid.set_block(wx, wy, wz, ty) {
            return false;
        }
        let owner = ChunkCoord::containing_block(wx, wz);
        let (ox, oz) = owner.origin();
        let edge = |local: i32| match local {
            0 => -1,
            l if l == CHUNK_SIZE as i32 - 1 => 1,
            _ => 0,
        };
        let (dx, dz) = (edge(wx - ox), edge(wz - oz));

        self.cache.mark_dirty(owner);
        if dx != 0 {
            self.cache.mark_dirty(owner.offset(dx, 0));
        }
        if dz != 0 {
            self.cache.mark_dirty(owner.offset(0, dz));
        }
        if dx != 0 && dz != 0 {
            self.cache.mark_dirty(owner.offset(dx, dz));
        }
        log::debug!(target: "edit", "set ({wx}, {wy}, {wz}) to {ty}");
        true
    }

    /// First non-air cell along the ray within `max_distance`, with the cell
    /// traversed just before it.
    pub fn raycast(&self, origin: Vec3, dir: Vec3, max_distance: f32) -> Option<RayHit> {
        raycast_first_hit(origin, dir, max_distance, |x, y, z| {
            !self.grid.get(x, y, z).is_air()
        })
    }

    /// Calls `f` for every opaque slice mesh of a clean chunk that intersects
    /// `frustum`, nearest first.
    pub fn for_each_visible_mesh<F>(&self, frustum: &Frustum, mut f: F)
    where
        F: FnMut(ChunkCoord, &Mesh),
    {
        let mut items: Vec<DrawItem<'_>> = Vec::new();
        for (coord, slot) in self.cache.iter() {
            let Some(mesh) = renderable_mesh(slot) else {
                continue;
            };
            for m in mesh.opaque_meshes() {
                if frustum.intersects_aabb(&m.bbox) {
                    items.push(DrawItem {
                        coord,
                        mesh: m,
                        distance_sq: (m.bbox.center() - self.camera).length_sq(),
                    });
                }
            }
        }
        sort_front_to_back(&mut items);
        for item in items {
            f(item.coord, item.mesh);
        }
    }

    /// Alpha meshes of clean chunks that intersect `frustum`, farthest first
    /// by horizontal distance from the camera.
    pub fn sorted_alpha_meshes(&self, frustum: &Frustum) -> Vec<DrawItem<'_>> {
        let mut items: Vec<DrawItem<'_>> = self
            .cache
            .iter()
            .filter_map(|(coord, slot)| {
                let alpha = renderable_mesh(slot)?.alpha.as_ref()?;
                frustum.intersects_aabb(&alpha.bbox).then(|| DrawItem {
                    coord,
                    mesh: alpha,
                    distance_sq: chunk_center(coord).distance_sq_xz(self.camera),
                })
            })
            .collect();
        sort_back_to_front(&mut items);
        items
    }

    pub fn stats(&self) -> StreamStats {
        let counts = self.cache.counts();
        let (queued_jobs, inflight_jobs) = self
            .runtime
            .as_ref()
            .map_or((0, 0), Runtime::queue_counts);
        StreamStats {
            center: self.cache.center(),
            resident: counts.resident,
            dirty: counts.dirty,
            generating: counts.generating,
            building: counts.building,
            queued_jobs,
            inflight_jobs,
            last_tick: self.last_tick,
        }
    }

    /// Blocks until no generation or mesh job is outstanding and no loaded
    /// chunk is dirty. Ignores the frame budget.
    pub fn settle(&mut self) {
        loop {
            self.apply_results();
            self.remesh_dirty(None);
            let counts = self.cache.counts();
            if counts.generating == 0
                && counts.building == 0
                && self.cache.dirty_in_scan_order().is_empty()
            {
                return;
            }
            let Some(rt) = &self.runtime else {
                return;
            };
            if let Some(out) = rt.wait_result(Duration::from_millis(250)) {
                self.apply_result(out);
            }
        }
    }

    #[inline]
    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.terrain.seed()
    }

    #[inline]
    pub fn camera(&self) -> Vec3 {
        self.camera
    }

    #[inline]
    pub fn center(&self) -> Option<ChunkCoord> {
        self.cache.center()
    }

    #[inline]
    pub fn view_distance(&self) -> usize {
        self.cache.view_distance()
    }

    #[inline]
    pub fn workers(&self) -> usize {
        self.runtime.as_ref().map_or(0, Runtime::workers)
    }

    /// Cache slot holding `coord`, if resident.
    #[inline]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&ChunkSlot<ChunkMeshCpu>> {
        self.cache.resident(coord)
    }

    /// Coordinates of the current window in scan order.
    pub fn window(&self) -> Vec<ChunkCoord> {
        match self.cache.center() {
            Some(c) => self.cache.window(c).collect(),
            None => Vec::new(),
        }
    }

    fn next_job_id(&mut self) -> u64 {
        self.next_job_id += 1;
        self.next_job_id
    }

    /// Recenters the cache and reloads every slot that now maps to a new
    /// coordinate. Returns the number of chunks reloaded.
    fn shift_window(&mut self, center: ChunkCoord) -> usize {
        let reload = self.cache.recenter(center);
        for &coord in &reload {
            self.load_chunk(coord);
        }
        let reloading: HashSet<ChunkCoord> = reload.iter().copied().collect();
        let mut touched = 0;
        for &coord in &reload {
            touched += self
                .cache
                .mark_neighbors_dirty(coord, |nb| reloading.contains(&nb));
        }
        log::info!(
            target: "stream",
            "window centered on ({}, {}): {} chunk(s) reloaded, {} neighbor(s) dirtied",
            center.cx,
            center.cz,
            reload.len(),
            touched
        );
        reload.len()
    }

    fn load_chunk(&mut self, coord: ChunkCoord) {
        let job_id = self.next_job_id();
        let evicted = match &self.runtime {
            None => {
                let evicted = self.cache.assign(coord, GenState::Loaded);
                self.terrain.generate_chunk(&mut self.grid, coord);
                evicted
            }
            Some(rt) => {
                let evicted = self.cache.assign(coord, GenState::Generating { job_id });
                self.grid.release(coord);
                rt.submit(Job::Generate { job_id, coord });
                evicted
            }
        };
        if let Some(old) = evicted {
            log::debug!(
                target: "stream",
                "slot ({}, {}) -> ({}, {})",
                old.cx,
                old.cz,
                coord.cx,
                coord.cz
            );
        }
    }

    fn apply_results(&mut self) -> usize {
        let results = match &self.runtime {
            Some(rt) => rt.drain_results(),
            None => return 0,
        };
        let n = results.len();
        for out in results {
            self.apply_result(out);
        }
        n
    }

    fn apply_result(&mut self, out: JobOut) {
        match out {
            JobOut::Generated {
                job_id,
                columns,
                t_gen_ms,
            } => {
                let coord = columns.coord;
                if !self.cache.finish_generation(coord, job_id) {
                    log::debug!(
                        target: "stream",
                        "dropping stale generation of ({}, {}), job {job_id}",
                        coord.cx,
                        coord.cz
                    );
                    return;
                }
                self.grid.install(&columns);
                // Corner shading reads diagonal neighbors too.
                for dz in -1..=1 {
                    for dx in -1..=1 {
                        if (dx, dz) != (0, 0) {
                            self.cache.mark_dirty(coord.offset(dx, dz));
                        }
                    }
                }
                log::debug!(
                    target: "stream",
                    "installed ({}, {}) in {t_gen_ms} ms",
                    coord.cx,
                    coord.cz
                );
            }
            JobOut::Meshed {
                job_id,
                coord,
                revision,
                mesh,
                t_mesh_ms,
            } => {
                let building = self.cache.resident(coord).map(|s| s.mesh_state);
                if building != Some(MeshState::Building { job_id, revision }) {
                    log::debug!(
                        target: "mesh",
                        "dropping stale mesh of ({}, {}), job {job_id}",
                        coord.cx,
                        coord.cz
                    );
                    return;
                }
                let installed = self.cache.install_mesh(coord, revision, mesh);
                log::trace!(
                    target: "mesh",
                    "mesh for ({}, {}) {installed:?} after {t_mesh_ms} ms",
                    coord.cx,
                    coord.cz
                );
            }
        }
    }

    /// Remeshes dirty chunks in scan order. With a budget, stops once the
    /// budget is spent, but always handles at least one chunk.
    fn remesh_dirty(&mut self, budget_ms: Option<u64>) -> usize {
        let start = self.clock.now_ms();
        let mut done = 0;
        for coord in self.cache.dirty_in_scan_order() {
            if done > 0 && budget_ms.is_some_and(|b| self.clock.now_ms().saturating_sub(start) >= b) {
                break;
            }
            self.remesh(coord);
            done += 1;
        }
        done
    }

    fn remesh(&mut self, coord: ChunkCoord) {
        let job_id = self.next_job_id();
        let Some(revision) = self.cache.begin_mesh(coord, job_id) else {
            return;
        };
        match &self.runtime {
            Some(rt) => {
                let snapshot = Box::new(ChunkSnapshot::capture(&self.grid, coord));
                rt.submit(Job::Tesselate {
                    job_id,
                    revision,
                    snapshot,
                });
            }
            None => {
                let mesh = build_chunk_mesh(
                    &self.grid,
                    coord,
                    &self.registry,
                    &self.atlas,
                    &mut self.scratch,
                );
                let installed = self.cache.install_mesh(coord, revision, mesh);
                debug_assert_eq!(installed, MeshInstall::Current);
            }
        }
    }
}

#[inline]
fn renderable_mesh(slot: &ChunkSlot<ChunkMeshCpu>) -> Option<&ChunkMeshCpu> {
    if slot.is_renderable() {
        slot.mesh.as_ref()
    } else {
        None
    }
}
