use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_channel::{Receiver, Sender, bounded};
use voxmap_mesh_cpu::MeshScratch;

/// Lock-free pool of tessellation arenas shared by the workers.
pub struct ScratchPool {
    available_tx: Sender<MeshScratch>,
    available_rx: Receiver<MeshScratch>,
    allocated: AtomicUsize,
    max_scratches: usize,
}

impl ScratchPool {
    pub fn new(max_scratches: usize) -> Self {
        debug_assert!(max_scratches > 0);
        let (tx, rx) = bounded(max_scratches);
        Self {
            available_tx: tx,
            available_rx: rx,
            allocated: AtomicUsize::new(0),
            max_scratches,
        }
    }

    pub fn with_capacity_from_workers(worker_count: usize) -> Arc<Self> {
        Arc::new(Self::new(worker_count.max(1)))
    }

    /// Takes an idle arena, creating one if under capacity, else waits for one.
    pub fn acquire(&self) -> PooledScratch<'_> {
        if let Ok(scratch) = self.available_rx.try_recv() {
            return PooledScratch {
                scratch,
                pool: self,
            };
        }

        loop {
            let current = self.allocated.load(Ordering::Acquire);
            if current < self.max_scratches {
                let prev = self.allocated.fetch_add(1, Ordering::AcqRel);
                if prev < self.max_scratches {
                    return PooledScratch {
                        scratch: MeshScratch::new(),
                        pool: self,
                    };
                }
                self.allocated.fetch_sub(1, Ordering::AcqRel);
            }

            if let Ok(scratch) = self.available_rx.recv() {
                return PooledScratch {
                    scratch,
                    pool: self,
                };
            }
        }
    }

    pub fn allocated(&self) -> usize {
        self.allocated.load(Ordering::Acquire)
    }

    fn release(&self, scratch: MeshScratch) {
        let _ = self.available_tx.send(scratch);
    }
}

pub struct PooledScratch<'pool> {
    scratch: MeshScratch,
    pool: &'pool ScratchPool,
}

impl Deref for PooledScratch<'_> {
    type Target = MeshScratch;

    fn deref(&self) -> &Self::Target {
        &self.scratch
    }
}

impl DerefMut for PooledScratch<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.scratch
    }
}

impl Drop for PooledScratch<'_> {
    fn drop(&mut self) {
        let scratch = std::mem::take(&mut self.scratch);
        self.pool.release(scratch);
    }
}
