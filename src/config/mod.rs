//! Target configuration
//!
//! Word width and integer width for the target, loaded from an optional
//! `minic.toml` next to the invocation.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Size in bytes of pointers and function designators
    #[serde(default = "default_word_size")]
    pub word_size: usize,
    /// Size in bytes of `int`
    #[serde(default = "default_word_size")]
    pub int_size: usize,
}

fn default_word_size() -> usize {
    8
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Try to load from minic.toml in the current directory, fall back to defaults
    pub fn load_or_default() -> Self {
        if let Ok(config) = Self::from_file("minic.toml") {
            return config;
        }
        Self::default()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            word_size: default_word_size(),
            int_size: default_word_size(),
        }
    }
}

/// Resolved target configuration used by analysis
#[derive(Debug, Clone)]
pub struct TargetConfig {
    pub word_size: usize,
    pub int_size: usize,
}

impl TargetConfig {
    pub fn from_config(config: Config) -> Self {
        Self {
            word_size: config.word_size,
            int_size: config.int_size,
        }
    }

    /// Load from minic.toml or use defaults
    pub fn load_or_default() -> Self {
        Self::from_config(Config::load_or_default())
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self::from_config(Config::default())
    }
}
