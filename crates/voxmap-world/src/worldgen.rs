use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::CHUNK_HEIGHT;
use crate::noise::NoiseKind;

#[derive(Debug, Error)]
pub enum WorldGenConfigError {
    #[error("failed to read worldgen config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse worldgen config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("worldgen references unknown block `{0}`")]
    UnknownBlock(String),
    #[error("ocean level {0} is outside the world height")]
    OceanLevel(i32),
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default)]
    pub height: Height,
    #[serde(default)]
    pub surface: Surface,
    #[serde(default)]
    pub water: Water,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Height {
    #[serde(default = "default_noise")]
    pub noise: NoiseKind,
    #[serde(default = "default_base")]
    pub base: f64,
    #[serde(default = "default_amplitude")]
    pub amplitude: f64,
    #[serde(default = "default_frequency")]
    pub frequency: f32,
    #[serde(default = "default_octaves")]
    pub octaves: i32,
}
fn default_noise() -> NoiseKind {
    NoiseKind::OpenSimplex2
}
fn default_base() -> f64 {
    64.0
}
fn default_amplitude() -> f64 {
    24.0
}
fn default_frequency() -> f32 {
    0.01
}
fn default_octaves() -> i32 {
    4
}
impl Default for Height {
    fn default() -> Self {
        Self {
            noise: default_noise(),
            base: default_base(),
            amplitude: default_amplitude(),
            frequency: default_frequency(),
            octaves: default_octaves(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Surface {
    #[serde(default = "default_primary")]
    pub primary: String,
    #[serde(default = "default_secondary")]
    pub secondary: String,
    #[serde(default = "default_subsoil")]
    pub subsoil: String,
    #[serde(default = "default_floor")]
    pub floor: String,
    #[serde(default = "default_floor_depth")]
    pub floor_depth: i32,
    /// Height band above the ocean over which the primary surface fades in.
    #[serde(default = "default_shore_band")]
    pub shore_band: f64,
}
fn default_primary() -> String {
    "grass".to_string()
}
fn default_secondary() -> String {
    "sand".to_string()
}
fn default_subsoil() -> String {
    "dirt".to_string()
}
fn default_floor() -> String {
    "bedrock".to_string()
}
fn default_floor_depth() -> i32 {
    2
}
fn default_shore_band() -> f64 {
    4.0
}
impl Default for Surface {
    fn default() -> Self {
        Self {
            primary: default_primary(),
            secondary: default_secondary(),
            subsoil: default_subsoil(),
            floor: default_floor(),
            floor_depth: default_floor_depth(),
            shore_band: default_shore_band(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Water {
    #[serde(default = "default_ocean_level")]
    pub ocean_level: i32,
    #[serde(default = "default_liquid")]
    pub block: String,
}
fn default_ocean_level() -> i32 {
    62
}
fn default_liquid() -> String {
    "water".to_string()
}
impl Default for Water {
    fn default() -> Self {
        Self {
            ocean_level: default_ocean_level(),
            block: default_liquid(),
        }
    }
}

/// Flattened generator inputs.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldGenParams {
    pub noise: NoiseKind,
    pub base_height: f64,
    pub amplitude: f64,
    pub frequency: f32,
    pub octaves: i32,
    pub ocean_level: i32,
    pub floor_depth: i32,
    pub shore_band: f64,
    pub surface_primary: String,
    pub surface_secondary: String,
    pub subsoil: String,
    pub floor: String,
    pub liquid: String,
}

impl WorldGenParams {
    pub fn from_config(cfg: &WorldGenConfig) -> Self {
        Self {
            noise: cfg.height.noise,
            base_height: cfg.height.base,
            amplitude: cfg.height.amplitude,
            frequency: cfg.height.frequency,
            octaves: cfg.height.octaves,
            ocean_level: cfg.water.ocean_level,
            floor_depth: cfg.surface.floor_depth,
            shore_band: cfg.surface.shore_band,
            surface_primary: cfg.surface.primary.clone(),
            surface_secondary: cfg.surface.secondary.clone(),
            subsoil: cfg.surface.subsoil.clone(),
            floor: cfg.surface.floor.clone(),
            liquid: cfg.water.block.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), WorldGenConfigError> {
        if self.ocean_level < 0 || self.ocean_level >= CHUNK_HEIGHT as i32 {
            return Err(WorldGenConfigError::OceanLevel(self.ocean_level));
        }
        Ok(())
    }
}

impl Default for WorldGenParams {
    fn default() -> Self {
        Self::from_config(&WorldGenConfig::default())
    }
}

pub fn params_from_toml_str(s: &str) -> Result<WorldGenParams, WorldGenConfigError> {
    let cfg: WorldGenConfig = toml::from_str(s)?;
    let params = WorldGenParams::from_config(&cfg);
    params.validate()?;
    Ok(params)
}

pub fn load_params_from_path(path: &Path) -> Result<WorldGenParams, WorldGenConfigError> {
    let s = fs::read_to_string(path)?;
    params_from_toml_str(&s)
}
