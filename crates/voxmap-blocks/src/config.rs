use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::registry::{BlockDef, BlockRegistry, DEFAULT_FALLBACK_IMAGE};

#[derive(Debug, Error)]
pub enum BlockConfigError {
    #[error("failed to read block config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse block config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("block table is empty")]
    Empty,
    #[error("block table has {0} entries, only 256 ids are addressable")]
    TooMany(usize),
    #[error("duplicate block name `{0}`")]
    Duplicate(String),
    #[error("block 0 must be non-dense air, found `{0}`")]
    AirNotFirst(String),
}

#[derive(Clone, Debug, Deserialize)]
pub struct BlocksConfig {
    #[serde(default = "default_fallback_image")]
    pub fallback_image: u16,
    #[serde(default)]
    pub blocks: Vec<BlockDef>,
}

fn default_fallback_image() -> u16 {
    DEFAULT_FALLBACK_IMAGE
}

impl BlockRegistry {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, BlockConfigError> {
        let cfg: BlocksConfig = toml::from_str(toml_str)?;
        Self::from_defs(cfg.blocks, cfg.fallback_image)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, BlockConfigError> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}
