// File: src/config.rs
// Purpose: Configuration parsing from virgule.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub routing: RoutingConfig,

    #[serde(default)]
    pub dispatch: DispatchConfig,
}

/// Routing configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RoutingConfig {
    /// Base path prepended to every mount prefix (e.g. "/api")
    #[serde(default)]
    pub base_path: Option<String>,
}

/// Dispatch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Suppress non-500 request logging
    #[serde(default = "default_false")]
    pub quiet: bool,

    /// Upper bound on decoded request bodies, in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_false() -> bool {
    false
}

fn default_max_body_bytes() -> usize {
    1_048_576
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            quiet: false,
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Missing or empty file means defaults
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from default path (./virgule.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("virgule.toml")
    }
}
