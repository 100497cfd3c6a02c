use voxmap_blocks::FaceSlot;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    PosY = 0,
    NegY = 1,
    PosX = 2,
    NegX = 3,
    PosZ = 4,
    NegZ = 5,
}

/// Corner sides `(su, sv)` in quad winding order a, b, c, d.
pub const QUAD_CORNERS: [(i32, i32); 4] = [(-1, -1), (1, -1), (1, 1), (-1, 1)];

impl Face {
    pub const ALL: [Face; 6] = [
        Face::PosY,
        Face::NegY,
        Face::PosX,
        Face::NegX,
        Face::PosZ,
        Face::NegZ,
    ];

    /// Returns the `[0..6)` index of this face.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the integer grid delta `(dx,dy,dz)` when stepping out of this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::PosY => (0, 1, 0),
            Face::NegY => (0, -1, 0),
            Face::PosX => (1, 0, 0),
            Face::NegX => (-1, 0, 0),
            Face::PosZ => (0, 0, 1),
            Face::NegZ => (0, 0, -1),
        }
    }

    /// In-plane axes `(u, v)` with `u x v` equal to the outward normal, so
    /// corners walked in [`QUAD_CORNERS`] order wind counter-clockwise seen
    /// from outside.
    #[inline]
    pub fn tangents(self) -> ((i32, i32, i32), (i32, i32, i32)) {
        const X: (i32, i32, i32) = (1, 0, 0);
        const Y: (i32, i32, i32) = (0, 1, 0);
        const Z: (i32, i32, i32) = (0, 0, 1);
        match self {
            Face::PosY => (Z, X),
            Face::NegY => (X, Z),
            Face::PosX => (Y, Z),
            Face::NegX => (Z, Y),
            Face::PosZ => (X, Y),
            Face::NegZ => (Y, X),
        }
    }

    /// Atlas image slot used for this face.
    #[inline]
    pub fn slot(self) -> FaceSlot {
        match self {
            Face::PosY => FaceSlot::Top,
            Face::NegY => FaceSlot::Bottom,
            Face::NegX => FaceSlot::Left,
            Face::PosX => FaceSlot::Right,
            Face::PosZ => FaceSlot::Front,
            Face::NegZ => FaceSlot::Back,
        }
    }

    /// Integer corner offset `0|1` per axis within the block for the corner on
    /// side `(su, sv)`.
    #[inline]
    pub fn corner_offset(self, su: i32, sv: i32) -> (i32, i32, i32) {
        let (n, (u, v)) = (self.delta(), self.tangents());
        let pick = |s: i32| if s > 0 { 1 } else { 0 };
        let on = |axis: i32, s: i32| if axis != 0 { pick(s) } else { 0 };
        (
            on(n.0, n.0) + on(u.0, su) + on(v.0, sv),
            on(n.1, n.1) + on(u.1, su) + on(v.1, sv),
            on(n.2, n.2) + on(u.2, su) + on(v.2, sv),
        )
    }

    /// Tile-relative texture coordinate `(s, t)` for a corner. `t` grows
    /// downward on side faces so tiles are upright.
    #[inline]
    pub fn tex_coord(self, su: i32, sv: i32) -> (u8, u8) {
        let hi = |s: i32| u8::from(s > 0);
        let lo = |s: i32| u8::from(s < 0);
        match self {
            Face::PosY | Face::NegY => (hi(su), hi(sv)),
            Face::PosX | Face::NegZ => (hi(sv), lo(su)),
            Face::NegX | Face::PosZ => (hi(su), lo(sv)),
        }
    }
}
