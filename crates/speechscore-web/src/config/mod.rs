//! Configuration loading for the speech scorer.
//! Reads speechscore.toml from the current directory or the path in the
//! SPEECHSCORE_CONFIG env var. A missing file means all defaults.

use serde::{Deserialize, Serialize};
use speechscore_embed::EmbeddingConfig;
use speechscore_rubric::ComponentWeights;
use std::path::Path;
use tracing::{info, warn};

pub const CONFIG_ENV: &str = "SPEECHSCORE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "speechscore.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub rubric: RubricConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "bool_true")]
    pub cors_permissive: bool,
}

fn default_bind() -> String { "127.0.0.1:8000".to_string() }
fn bool_true()    -> bool   { true }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cors_permissive: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RubricConfig {
    #[serde(default = "default_rubric_path")]
    pub path: String,
}

fn default_rubric_path() -> String { "rubric.csv".to_string() }

impl Default for RubricConfig {
    fn default() -> Self {
        Self { path: default_rubric_path() }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Component weights used when a request does not send its own.
    #[serde(default)]
    pub weights: ComponentWeights,
}


impl Config {
    /// Load configuration, checking SPEECHSCORE_CONFIG first, then
    /// speechscore.toml in the current directory.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        if !Path::new(&path).exists() {
            warn!(path = %path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        info!(path = %path, "Loading config");
        Self::from_path(&path)
    }

    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.scoring.weights.validate()?;
        Ok(config)
    }
}
