use voxmap_geom::Vec3;

/// Sub-steps taken per unit of ray length.
pub const STEPS_PER_UNIT: u32 = 32;

/// First solid cell a ray entered, plus the cell it came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RayHit {
    pub bx: i32,
    pub by: i32,
    pub bz: i32,
    pub px: i32,
    pub py: i32,
    pub pz: i32,
}

impl RayHit {
    #[inline]
    pub fn hit(&self) -> (i32, i32, i32) {
        (self.bx, self.by, self.bz)
    }

    /// Cell traversed just before the hit; where a placed block goes.
    #[inline]
    pub fn before(&self) -> (i32, i32, i32) {
        (self.px, self.py, self.pz)
    }
}

#[inline]
fn cell_of(p: Vec3) -> (i32, i32, i32) {
    (p.x.floor() as i32, p.y.floor() as i32, p.z.floor() as i32)
}

/// Marches `origin + t * dir` in fixed `1 / STEPS_PER_UNIT` increments and
/// reports the first transition into a cell for which `is_solid` holds.
///
/// The cell containing `origin` is never tested. At most
/// `max_dist * STEPS_PER_UNIT` steps are taken.
pub fn raycast_first_hit<F>(origin: Vec3, dir: Vec3, max_dist: f32, mut is_solid: F) -> Option<RayHit>
where
    F: FnMut(i32, i32, i32) -> bool,
{
    let len = dir.length();
    if len < 1e-6 || max_dist.is_nan() || max_dist <= 0.0 {
        return None;
    }
    let step = dir / (len * STEPS_PER_UNIT as f32);
    let steps = (max_dist * STEPS_PER_UNIT as f32) as u32;

    let mut prev = cell_of(origin);
    for i in 1..=steps {
        let cell = cell_of(origin + step * i as f32);
        if cell == prev {
            continue;
        }
        if is_solid(cell.0, cell.1, cell.2) {
            return Some(RayHit {
                bx: cell.0,
                by: cell.1,
                bz: cell.2,
                px: prev.0,
                py: prev.1,
                pz: prev.2,
            });
        }
        prev = cell;
    }
    None
}
