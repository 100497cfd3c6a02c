use voxmap_world::ChunkCoord;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GenState {
    #[default]
    Empty,
    Generating {
        job_id: u64,
    },
    Loaded,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MeshState {
    #[default]
    None,
    Building {
        job_id: u64,
        revision: u64,
    },
    Current,
}

/// One cell of the toroidal cache. `coord` is the chunk whose data the slot
/// currently holds; `revision` bumps every time the slot is dirtied so a mesh
/// built against older data can be told apart.
#[derive(Debug)]
pub struct ChunkSlot<M> {
    pub coord: Option<ChunkCoord>,
    pub dirty: bool,
    pub gen_state: GenState,
    pub mesh_state: MeshState,
    pub revision: u64,
    pub mesh: Option<M>,
}

impl<M> Default for ChunkSlot<M> {
    fn default() -> Self {
        Self {
            coord: None,
            dirty: false,
            gen_state: GenState::Empty,
            mesh_state: MeshState::None,
            revision: 0,
            mesh: None,
        }
    }
}

impl<M> ChunkSlot<M> {
    #[inline]
    pub fn holds(&self, coord: ChunkCoord) -> bool {
        self.coord == Some(coord)
    }

    /// Loaded, clean, and carrying a mesh.
    #[inline]
    pub fn is_renderable(&self) -> bool {
        self.gen_state == GenState::Loaded && !self.dirty && self.mesh.is_some()
    }

    /// Dirty, loaded, and not already being meshed by a worker.
    #[inline]
    pub fn wants_mesh(&self) -> bool {
        self.dirty
            && self.gen_state == GenState::Loaded
            && !matches!(self.mesh_state, MeshState::Building { .. })
    }

    fn touch(&mut self) {
        self.dirty = true;
        self.revision = self.revision.wrapping_add(1);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeshInstall {
    /// Built against the slot's latest data; the slot is now clean.
    Current,
    /// Slot changed while building; mesh kept but the slot stays dirty.
    Outdated,
    /// Slot no longer holds that chunk; mesh dropped.
    Stale,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheCounts {
    pub resident: usize,
    pub dirty: usize,
    pub generating: usize,
    pub building: usize,
}

/// `W x W` slot array, `W = 2 * view_distance`, indexed by chunk coordinate
/// modulo `W`.
pub struct ChunkCache<M> {
    view_distance: i32,
    width: usize,
    slots: Vec<ChunkSlot<M>>,
    center: Option<ChunkCoord>,
}

impl<M> ChunkCache<M> {
    pub fn new(view_distance: usize) -> Self {
        assert!(view_distance > 0, "view distance must be at least one chunk");
        let width = view_distance * 2;
        let mut slots = Vec::with_capacity(width * width);
        slots.resize_with(width * width, ChunkSlot::default);
        Self {
            view_distance: view_distance as i32,
            width,
            slots,
            center: None,
        }
    }

    #[inline]
    pub fn view_distance(&self) -> usize {
        self.view_distance as usize
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn center(&self) -> Option<ChunkCoord> {
        self.center
    }

    #[inline]
    pub fn slot_index(&self, coord: ChunkCoord) -> usize {
        let w = self.width as i32;
        coord.cz.rem_euclid(w) as usize * self.width + coord.cx.rem_euclid(w) as usize
    }

    /// The physical slot `coord` maps onto, whatever it holds.
    #[inline]
    pub fn slot(&self, coord: ChunkCoord) -> &ChunkSlot<M> {
        &self.slots[self.slot_index(coord)]
    }

    #[inline]
    pub fn resident(&self, coord: ChunkCoord) -> Option<&ChunkSlot<M>> {
        let slot = self.slot(coord);
        slot.holds(coord).then_some(slot)
    }

    #[inline]
    pub fn resident_mut(&mut self, coord: ChunkCoord) -> Option<&mut ChunkSlot<M>> {
        let i = self.slot_index(coord);
        let slot = &mut self.slots[i];
        if slot.holds(coord) { Some(slot) } else { None }
    }

    /// Window around `center`, row-major: Z rows, X within a row.
    /// Covers `[c - vd, c + vd)` on both axes, one coordinate per slot.
    pub fn window(&self, center: ChunkCoord) -> impl Iterator<Item = ChunkCoord> + use<M> {
        let vd = self.view_distance;
        (-vd..vd).flat_map(move |dz| (-vd..vd).map(move |dx| center.offset(dx, dz)))
    }

    #[inline]
    pub fn in_window(&self, center: ChunkCoord, coord: ChunkCoord) -> bool {
        let vd = self.view_distance;
        let dx = coord.cx - center.cx;
        let dz = coord.cz - center.cz;
        (-vd..vd).contains(&dx) && (-vd..vd).contains(&dz)
    }

    /// Moves the window and returns, in scan order, every coordinate whose
    /// slot holds something else.
    pub fn recenter(&mut self, center: ChunkCoord) -> Vec<ChunkCoord> {
        self.center = Some(center);
        let reload: Vec<ChunkCoord> = self
            .window(center)
            .filter(|c| !self.slot(*c).holds(*c))
            .collect();
        log::trace!(
            target: "stream",
            "recenter on ({}, {}): {} of {} slot(s) need reload",
            center.cx,
            center.cz,
            reload.len(),
            self.slots.len()
        );
        reload
    }

    /// Hands the slot to `coord`, dropping its mesh. Returns the evicted chunk.
    pub fn assign(&mut self, coord: ChunkCoord, gen_state: GenState) -> Option<ChunkCoord> {
        let i = self.slot_index(coord);
        let slot = &mut self.slots[i];
        let evicted = slot.coord.filter(|c| *c != coord);
        slot.coord = Some(coord);
        slot.gen_state = gen_state;
        slot.mesh_state = MeshState::None;
        slot.mesh = None;
        slot.touch();
        evicted
    }

    /// Applies a finished generation job. False when the slot moved on or a
    /// newer job owns it.
    pub fn finish_generation(&mut self, coord: ChunkCoord, job_id: u64) -> bool {
        match self.resident_mut(coord) {
            Some(slot) if slot.gen_state == (GenState::Generating { job_id }) => {
                slot.gen_state = GenState::Loaded;
                slot.touch();
                true
            }
            _ => false,
        }
    }

    /// Dirties a resident chunk. False if `coord` is not resident.
    pub fn mark_dirty(&mut self, coord: ChunkCoord) -> bool {
        match self.resident_mut(coord) {
            Some(slot) => {
                slot.touch();
                true
            }
            None => false,
        }
    }

    /// Dirties the resident axis neighbors of `coord` for which `skip` is false.
    pub fn mark_neighbors_dirty(
        &mut self,
        coord: ChunkCoord,
        mut skip: impl FnMut(ChunkCoord) -> bool,
    ) -> usize {
        let mut n = 0;
        for nb in coord.neighbors4() {
            if !skip(nb) && self.mark_dirty(nb) {
                n += 1;
            }
        }
        n
    }

    /// Dirty chunks ready to mesh, in scan order over the current window.
    pub fn dirty_in_scan_order(&self) -> Vec<ChunkCoord> {
        let Some(center) = self.center else {
            return Vec::new();
        };
        self.window(center)
            .filter(|c| self.resident(*c).is_some_and(|s| s.wants_mesh()))
            .collect()
    }

    /// Records that a worker is meshing `coord`; returns the revision it builds against.
    pub fn begin_mesh(&mut self, coord: ChunkCoord, job_id: u64) -> Option<u64> {
        let slot = self.resident_mut(coord)?;
        let revision = slot.revision;
        slot.mesh_state = MeshState::Building { job_id, revision };
        Some(revision)
    }

    pub fn install_mesh(&mut self, coord: ChunkCoord, revision: u64, mesh: M) -> MeshInstall {
        let Some(slot) = self.resident_mut(coord) else {
            return MeshInstall::Stale;
        };
        slot.mesh = Some(mesh);
        if slot.revision == revision {
            slot.dirty = false;
            slot.mesh_state = MeshState::Current;
            MeshInstall::Current
        } else {
            slot.mesh_state = MeshState::None;
            MeshInstall::Outdated
        }
    }

    /// Occupied slots with their coordinate.
    pub fn iter(&self) -> impl Iterator<Item = (ChunkCoord, &ChunkSlot<M>)> {
        self.slots
            .iter()
            .filter_map(|s| s.coord.map(|c| (c, s)))
    }

    pub fn counts(&self) -> CacheCounts {
        let mut out = CacheCounts::default();
        for (_, s) in self.iter() {
            out.resident += 1;
            if s.dirty {
                out.dirty += 1;
            }
            if matches!(s.gen_state, GenState::Generating { .. }) {
                out.generating += 1;
            }
            if matches!(s.mesh_state, MeshState::Building { .. }) {
                out.building += 1;
            }
        }
        out
    }
}
