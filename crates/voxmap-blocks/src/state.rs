/// Index into the block registry.
pub type BlockId = u8;

pub const AIR: BlockId = 0;
pub const MAX_LIGHT: u8 = 15;

const SUN_SHIFT: u32 = 28;
const LAMP_R_SHIFT: u32 = 24;
const LAMP_G_SHIFT: u32 = 20;
const LAMP_B_SHIFT: u32 = 16;
const META_SHIFT: u32 = 8;
const NIBBLE: u32 = 0xF;
const BYTE: u32 = 0xFF;

/// Packed per-cell word.
///
/// Bit layout, high to low: `sun:4 | lamp_r:4 | lamp_g:4 | lamp_b:4 | metadata:8 | type:8`.
/// The mesher reads the light nibbles straight out of this layout, so the
/// raw value must stay stable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct BlockState(u32);

impl BlockState {
    /// What lies outside the resident window or above/below the world: air, fully sunlit.
    pub const SKY: BlockState = BlockState((MAX_LIGHT as u32) << SUN_SHIFT);

    #[inline]
    pub const fn new(ty: BlockId) -> Self {
        Self(ty as u32)
    }

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn block_type(self) -> BlockId {
        (self.0 & BYTE) as BlockId
    }

    #[inline]
    pub const fn is_air(self) -> bool {
        self.block_type() == AIR
    }

    #[inline]
    pub const fn metadata(self) -> u8 {
        ((self.0 >> META_SHIFT) & BYTE) as u8
    }

    #[inline]
    pub const fn sunlight(self) -> u8 {
        ((self.0 >> SUN_SHIFT) & NIBBLE) as u8
    }

    #[inline]
    pub const fn lamp(self) -> [u8; 3] {
        [
            ((self.0 >> LAMP_R_SHIFT) & NIBBLE) as u8,
            ((self.0 >> LAMP_G_SHIFT) & NIBBLE) as u8,
            ((self.0 >> LAMP_B_SHIFT) & NIBBLE) as u8,
        ]
    }

    /// Light nibbles in vertex-color order: `[lamp_r, lamp_g, lamp_b, sun]`.
    #[inline]
    pub const fn light_channels(self) -> [u8; 4] {
        let [r, g, b] = self.lamp();
        [r, g, b, self.sunlight()]
    }

    #[inline]
    pub const fn with_block_type(self, ty: BlockId) -> Self {
        Self((self.0 & !BYTE) | ty as u32)
    }

    #[inline]
    pub const fn with_metadata(self, meta: u8) -> Self {
        Self((self.0 & !(BYTE << META_SHIFT)) | ((meta as u32) << META_SHIFT))
    }

    #[inline]
    pub const fn with_sunlight(self, sun: u8) -> Self {
        Self((self.0 & !(NIBBLE << SUN_SHIFT)) | (((sun as u32) & NIBBLE) << SUN_SHIFT))
    }

    #[inline]
    pub const fn with_lamp(self, r: u8, g: u8, b: u8) -> Self {
        let cleared = self.0
            & !((NIBBLE << LAMP_R_SHIFT) | (NIBBLE << LAMP_G_SHIFT) | (NIBBLE << LAMP_B_SHIFT));
        Self(
            cleared
                | (((r as u32) & NIBBLE) << LAMP_R_SHIFT)
                | (((g as u32) & NIBBLE) << LAMP_G_SHIFT)
                | (((b as u32) & NIBBLE) << LAMP_B_SHIFT),
        )
    }
}

impl From<BlockState> for u32 {
    fn from(value: BlockState) -> Self {
        value.raw()
    }
}
