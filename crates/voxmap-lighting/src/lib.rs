//! Column sunlight and per-corner light averaging.
#![forbid(unsafe_code)]

use std::sync::LazyLock;

use voxmap_blocks::{BlockState, MAX_LIGHT};

// Visual-only floor so unlit faces are not pitch black. Does not affect
// stored light values.
pub const VISUAL_LIGHT_MIN: u8 = 18;

pub const GAMMA: f32 = 2.2;

/// Number of front-layer cells averaged into one vertex corner.
pub const CORNER_TAPS: usize = 7;

static GAMMA_LUT: LazyLock<[u8; 16]> = LazyLock::new(|| {
    let mut lut = [0u8; 16];
    for (level, out) in lut.iter_mut().enumerate() {
        let linear = level as f32 / MAX_LIGHT as f32;
        let v = (linear.powf(1.0 / GAMMA) * 255.0).round() as u8;
        *out = v.max(VISUAL_LIGHT_MIN);
    }
    lut
});

/// Maps a 4-bit light level to perceptual 0..=255 brightness.
#[inline]
pub fn gamma(level: u8) -> u8 {
    GAMMA_LUT[(level & 0xF) as usize]
}

pub fn gamma_table() -> &'static [u8; 16] {
    &GAMMA_LUT
}

/// Offsets `(du, dv)` in the face plane sampled for the corner on the
/// `(su, sv)` side (each `-1` or `+1`). The 3x3 block around the face cell,
/// minus the two off-diagonal corners `(su, -sv)` and `(-su, sv)`.
///
/// Opposite corners on the same diagonal share one tap set, so a quad carries
/// two distinct shades: one per diagonal.
pub fn corner_taps(su: i32, sv: i32) -> [(i32, i32); CORNER_TAPS] {
    let mut out = [(0, 0); CORNER_TAPS];
    let mut n = 0;
    for dv in -1..=1 {
        for du in -1..=1 {
            if (du, dv) == (su, -sv) || (du, dv) == (-su, sv) {
                continue;
            }
            out[n] = (du, dv);
            n += 1;
        }
    }
    debug_assert_eq!(n, CORNER_TAPS);
    out
}

/// Per-channel gamma-mapped average, in vertex color order `[r, g, b, sun]`.
pub fn average_corner(samples: &[BlockState]) -> [u8; 4] {
    if samples.is_empty() {
        return [gamma(0), gamma(0), gamma(0), gamma(0)];
    }
    let mut acc = [0u32; 4];
    for s in samples {
        for (a, ch) in acc.iter_mut().zip(s.light_channels()) {
            *a += u32::from(gamma(ch));
        }
    }
    let n = samples.len() as u32;
    acc.map(|a| ((a + n / 2) / n) as u8)
}

/// Re-derives sunlight top-down over one column (`column[y]`, y ascending).
/// Cells above the first non-air cell get full sun; that cell and everything
/// below it get none. Returns the height of the first non-air cell, if any.
pub fn relight_column(column: &mut [BlockState]) -> Option<usize> {
    let mut sun = MAX_LIGHT;
    let mut top = None;
    for y in (0..column.len()).rev() {
        let cell = column[y];
        if !cell.is_air() {
            sun = 0;
            top.get_or_insert(y);
        }
        column[y] = cell.with_sunlight(sun);
    }
    top
}

#[cfg(test)]
mod tests;
