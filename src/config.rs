use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Deserialize;
use thiserror::Error;
use voxmap_blocks::{AtlasLayout, BlockConfigError, BlockRegistry};
use voxmap_world::{WorldGenConfig, WorldGenParams};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read engine config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse engine config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("view distance must be at least 1 chunk")]
    ViewDistance,
    #[error(transparent)]
    Blocks(#[from] BlockConfigError),
}

/// Top-level engine settings, one TOML document.
///
/// ```toml
/// [world]
/// seed = 1234
/// view_distance = 6
/// blocks = "assets/blocks.toml"
///
/// [streaming]
/// mesh_budget_ms = 8
/// workers = 4
///
/// [atlas]
/// atlas_width = 256
///
/// [worldgen.height]
/// amplitude = 30.0
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub world: WorldSection,
    #[serde(default)]
    pub streaming: StreamingSection,
    #[serde(default)]
    pub atlas: AtlasLayout,
    #[serde(default)]
    pub worldgen: WorldGenConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct WorldSection {
    /// Fixed seed; when absent one is drawn from the system clock at init.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_view_distance")]
    pub view_distance: usize,
    /// Block table; the built-in table is used when absent.
    #[serde(default)]
    pub blocks: Option<PathBuf>,
}

impl Default for WorldSection {
    fn default() -> Self {
        Self {
            seed: None,
            view_distance: default_view_distance(),
            blocks: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct StreamingSection {
    /// Wall-clock cap on remeshing per tick. At least one chunk is always meshed.
    #[serde(default = "default_mesh_budget_ms")]
    pub mesh_budget_ms: u64,
    /// Background workers; 0 runs generation and meshing inline.
    #[serde(default)]
    pub workers: usize,
}

impl Default for StreamingSection {
    fn default() -> Self {
        Self {
            mesh_budget_ms: default_mesh_budget_ms(),
            workers: 0,
        }
    }
}

fn default_view_distance() -> usize {
    4
}
fn default_mesh_budget_ms() -> u64 {
    8
}

impl EngineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: EngineConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&s)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world.view_distance == 0 {
            return Err(ConfigError::ViewDistance);
        }
        Ok(())
    }

    /// The configured seed, or one derived from the current time.
    pub fn resolve_seed(&self) -> u64 {
        self.world.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        })
    }

    pub fn registry(&self) -> Result<BlockRegistry, ConfigError> {
        match &self.world.blocks {
            Some(path) => Ok(BlockRegistry::load_from_path(path)?),
            None => Ok(BlockRegistry::builtin()),
        }
    }

    pub fn worldgen_params(&self) -> WorldGenParams {
        WorldGenParams::from_config(&self.worldgen)
    }
}
