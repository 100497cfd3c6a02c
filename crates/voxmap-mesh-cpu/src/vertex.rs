use bytemuck::{Pod, Zeroable};

/// Packed chunk vertex, 16 bytes.
///
/// `position` is the chunk-local integer corner (x, y, z, pad), `uv` the atlas
/// coordinate scaled to `0..=65535`, `color` the averaged light as
/// `[lamp_r, lamp_g, lamp_b, sun]`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Vertex {
    pub position: [u16; 4],
    pub uv: [u16; 2],
    pub color: [u8; 4],
}

impl Vertex {
    #[inline]
    pub fn new(pos: (i32, i32, i32), uv: (f32, f32), color: [u8; 4]) -> Self {
        debug_assert!(pos.0 >= 0 && pos.1 >= 0 && pos.2 >= 0);
        Self {
            position: [pos.0 as u16, pos.1 as u16, pos.2 as u16, 0],
            uv: [quantize_uv(uv.0), quantize_uv(uv.1)],
            color,
        }
    }

    #[inline]
    pub fn sun(&self) -> u8 {
        self.color[3]
    }
}

/// Normalized texture coordinate to 16-bit fixed point.
#[inline]
pub fn quantize_uv(v: f32) -> u16 {
    (v.clamp(0.0, 1.0) * f32::from(u16::MAX)).round() as u16
}
