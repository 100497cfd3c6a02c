//! Background workers for terrain generation and chunk tessellation.
#![forbid(unsafe_code)]

mod scratch_pool;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, unbounded};
use rayon::{ThreadPool, ThreadPoolBuilder};
use voxmap_blocks::{AtlasLayout, BlockRegistry};
use voxmap_chunk::ChunkSnapshot;
use voxmap_mesh_cpu::{ChunkMeshCpu, build_chunk_mesh};
use voxmap_world::{ChunkColumns, ChunkCoord, TerrainGenerator};

pub use rayon::ThreadPoolBuildError;
pub use scratch_pool::{PooledScratch, ScratchPool};

/// Work handed to the pool. Jobs own everything they read, so workers never
/// touch the live grid.
#[derive(Debug)]
pub enum Job {
    Generate {
        job_id: u64,
        coord: ChunkCoord,
    },
    Tesselate {
        job_id: u64,
        revision: u64,
        snapshot: Box<ChunkSnapshot>,
    },
}

impl Job {
    pub fn job_id(&self) -> u64 {
        match self {
            Job::Generate { job_id, .. } | Job::Tesselate { job_id, .. } => *job_id,
        }
    }

    pub fn coord(&self) -> ChunkCoord {
        match self {
            Job::Generate { coord, .. } => *coord,
            Job::Tesselate { snapshot, .. } => snapshot.coord,
        }
    }
}

pub enum JobOut {
    Generated {
        job_id: u64,
        columns: ChunkColumns,
        t_gen_ms: u32,
    },
    Meshed {
        job_id: u64,
        coord: ChunkCoord,
        revision: u64,
        mesh: ChunkMeshCpu,
        t_mesh_ms: u32,
    },
}

/// Read-only state every worker shares.
struct WorkerContext {
    terrain: Arc<TerrainGenerator>,
    registry: Arc<BlockRegistry>,
    atlas: AtlasLayout,
}

fn elapsed_ms(t0: Instant) -> u32 {
    t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32
}

fn process_job(job: Job, ctx: &WorkerContext, scratch_pool: &ScratchPool, tx: &Sender<JobOut>) {
    let out = match job {
        Job::Generate { job_id, coord } => {
            let t0 = Instant::now();
            let columns = ctx.terrain.generate_columns(coord);
            JobOut::Generated {
                job_id,
                columns,
                t_gen_ms: elapsed_ms(t0),
            }
        }
        Job::Tesselate {
            job_id,
            revision,
            snapshot,
        } => {
            let t0 = Instant::now();
            let mut scratch = scratch_pool.acquire();
            let mesh = build_chunk_mesh(
                snapshot.as_ref(),
                snapshot.coord,
                &ctx.registry,
                &ctx.atlas,
                &mut scratch,
            );
            JobOut::Meshed {
                job_id,
                coord: snapshot.coord,
                revision,
                mesh,
                t_mesh_ms: elapsed_ms(t0),
            }
        }
    };
    // Receiver gone means the owner is shutting down.
    let _ = tx.send(out);
}

/// Fixed-size rayon pool fed through an unbounded job channel.
///
/// Dropping the runtime closes the job channel; workers finish what they hold
/// and exit.
pub struct Runtime {
    job_tx: Sender<Job>,
    res_rx: Receiver<JobOut>,
    _pool: Arc<ThreadPool>,
    scratch_pool: Arc<ScratchPool>,
    queued: Arc<AtomicUsize>,
    inflight: Arc<AtomicUsize>,
    workers: usize,
}

impl Runtime {
    pub fn new(
        workers: usize,
        terrain: Arc<TerrainGenerator>,
        registry: Arc<BlockRegistry>,
        atlas: AtlasLayout,
    ) -> Result<Self, ThreadPoolBuildError> {
        let workers = workers.max(1);
        let (job_tx, job_rx) = unbounded::<Job>();
        let (res_tx, res_rx) = unbounded::<JobOut>();
        let scratch_pool = ScratchPool::with_capacity_from_workers(workers);
        let queued = Arc::new(AtomicUsize::new(0));
        let inflight = Arc::new(AtomicUsize::new(0));
        let ctx = Arc::new(WorkerContext {
            terrain,
            registry,
            atlas,
        });

        let pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("voxmap-worker-{i}"))
                .build()?,
        );
        for _ in 0..workers {
            let rx = job_rx.clone();
            let tx = res_tx.clone();
            let ctx = ctx.clone();
            let scratch_pool = scratch_pool.clone();
            let queued = queued.clone();
            let inflight = inflight.clone();
            pool.spawn(move || {
                while let Ok(job) = rx.recv() {
                    queued.fetch_sub(1, Ordering::Relaxed);
                    inflight.fetch_add(1, Ordering::Relaxed);
                    process_job(job, ctx.as_ref(), scratch_pool.as_ref(), &tx);
                    inflight.fetch_sub(1, Ordering::Relaxed);
                }
            });
        }
        log::info!(target: "runtime", "started {workers} worker thread(s)");

        Ok(Self {
            job_tx,
            res_rx,
            _pool: pool,
            scratch_pool,
            queued,
            inflight,
            workers,
        })
    }

    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn submit(&self, job: Job) {
        log::trace!(
            target: "runtime",
            "submit job {} for ({}, {})",
            job.job_id(),
            job.coord().cx,
            job.coord().cz
        );
        self.queued.fetch_add(1, Ordering::Relaxed);
        if self.job_tx.send(job).is_err() {
            self.queued.fetch_sub(1, Ordering::Relaxed);
            log::warn!(target: "runtime", "job channel closed; job dropped");
        }
    }

    /// Everything workers have finished since the last call, without blocking.
    pub fn drain_results(&self) -> Vec<JobOut> {
        self.res_rx.try_iter().collect()
    }

    /// Blocks for one result, up to `timeout`.
    pub fn wait_result(&self, timeout: Duration) -> Option<JobOut> {
        self.res_rx.recv_timeout(timeout).ok()
    }

    /// `(queued, inflight)` job counts.
    pub fn queue_counts(&self) -> (usize, usize) {
        (
            self.queued.load(Ordering::Relaxed),
            self.inflight.load(Ordering::Relaxed),
        )
    }

    /// True when nothing is queued or running.
    pub fn is_idle(&self) -> bool {
        self.queue_counts() == (0, 0)
    }

    pub fn scratch_arenas(&self) -> usize {
        self.scratch_pool.allocated()
    }
}
