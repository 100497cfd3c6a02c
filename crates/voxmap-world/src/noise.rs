use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};
use serde::Deserialize;

/// Gradient noise flavor for the height field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseKind {
    #[default]
    OpenSimplex2,
    OpenSimplex2S,
}

/// Folds a 64-bit world seed into the 32-bit seed the noise library takes.
#[inline]
pub fn fold_seed(seed: u64) -> i32 {
    let h = splitmix64(seed);
    ((h >> 32) ^ h) as u32 as i32
}

#[inline]
pub fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Seeded fBm height field.
pub struct NoiseField {
    noise: FastNoiseLite,
}

impl NoiseField {
    pub fn new(seed: u64, kind: NoiseKind, frequency: f32, octaves: i32) -> Self {
        let mut noise = FastNoiseLite::with_seed(fold_seed(seed));
        noise.set_noise_type(Some(match kind {
            NoiseKind::OpenSimplex2 => NoiseType::OpenSimplex2,
            NoiseKind::OpenSimplex2S => NoiseType::OpenSimplex2S,
        }));
        noise.set_frequency(Some(frequency));
        noise.set_fractal_type(Some(FractalType::FBm));
        noise.set_fractal_octaves(Some(octaves.max(1)));
        Self { noise }
    }

    /// Roughly in `[-1, 1]`.
    #[inline]
    pub fn sample(&self, x: i32, z: i32) -> f64 {
        f64::from(self.noise.get_noise_2d(x as f32, z as f32))
    }
}

/// Per-column linear congruential stream. A pure function of
/// `(world seed, x, z)` so regenerated columns match bit for bit.
#[derive(Clone, Copy, Debug)]
pub struct ColumnRng {
    state: u64,
}

impl ColumnRng {
    const MUL: u64 = 6_364_136_223_846_793_005;
    const INC: u64 = 1_442_695_040_888_963_407;

    pub fn for_column(seed: u64, x: i32, z: i32) -> Self {
        let xz = (u64::from(x as u32) << 32) | u64::from(z as u32);
        Self {
            state: splitmix64(seed ^ splitmix64(xz)),
        }
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(Self::MUL).wrapping_add(Self::INC);
        (self.state >> 33) as u32
    }

    /// Uniform in `[0, 1)`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32() >> 1) / f64::from(1u32 << 31)
    }
}
