//! Engine configuration.
//!
//! An optional `engine.toml` next to the binary selects the search
//! backend and evaluation strategy; everything in it can also be changed
//! over UCI with `setoption`. A missing file means defaults.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchBackend {
    Alphabeta,
    Mcts,
}

impl FromStr for SearchBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "alphabeta" => Ok(Self::Alphabeta),
            "mcts" => Ok(Self::Mcts),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvalStrategy {
    Material,
    Pst,
    Nnue,
}

impl FromStr for EvalStrategy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "material" => Ok(Self::Material),
            "pst" => Ok(Self::Pst),
            "nnue" => Ok(Self::Nnue),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchBackend,
    pub eval: EvalStrategy,
    /// Transposition table size in megabytes (alpha-beta only)
    pub hash_mb: usize,
    /// Depth used when `go` gives no limits
    pub depth: u8,
    /// NNUE weight file; the nnue strategy scores 0 everywhere without one
    pub weights: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: SearchBackend::Alphabeta,
            eval: EvalStrategy::Pst,
            hash_mb: alphabeta_engine::DEFAULT_HASH_MB,
            depth: 6,
            weights: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("malformed config {}", path.display()))
    }

    /// Load `engine.toml` if present, defaults otherwise. A malformed
    /// file is an error: starting with silently wrong settings is worse
    /// than not starting.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
