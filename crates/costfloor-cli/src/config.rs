use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use costfloor_core::primitive::{ARGON2_DEFAULT_MEMORY_KIB, ARGON2_DEFAULT_PARALLELISM};
use costfloor_core::SearchStrategy;

use crate::constants::APP_DIR;

/// Default minimum hash duration in milliseconds.
pub const DEFAULT_MIN_DURATION_MS: u64 = 250;

#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CostFloorConfig {
    #[serde(default)]
    pub policy: PolicySection,
    #[serde(default)]
    pub argon2: Argon2Section,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PolicySection {
    pub min_duration_ms: u64,
    pub algorithm: Algorithm,
    pub strategy: SearchStrategy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_cost: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_cost: Option<u32>,
}

impl Default for PolicySection {
    fn default() -> Self {
        Self {
            min_duration_ms: DEFAULT_MIN_DURATION_MS,
            algorithm: Algorithm::default(),
            strategy: SearchStrategy::default(),
            min_cost: None,
            max_cost: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Argon2Section {
    pub memory_kib: u32,
    pub parallelism: u32,
}

impl Default for Argon2Section {
    fn default() -> Self {
        Self {
            memory_kib: ARGON2_DEFAULT_MEMORY_KIB,
            parallelism: ARGON2_DEFAULT_PARALLELISM,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    #[default]
    Bcrypt,
    Argon2,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Bcrypt => "bcrypt",
            Algorithm::Argon2 => "argon2",
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn read_config(path: &Path) -> anyhow::Result<CostFloorConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &CostFloorConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join(APP_DIR));
        }
    }
    Ok(home_dir()?.join(".config").join(APP_DIR))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
