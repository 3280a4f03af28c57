//! Configuration for rowdiff
//!
//! Supports loading from `.rowdiff.toml` (working directory) or `~/.config/rowdiff/config.toml` (global).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::matching::DuplicatePolicy;
use crate::core::reconcile::{DiffAlgorithm, Reconciler};
use crate::surface::RowAnimations;

/// Name of the local config file
pub const LOCAL_CONFIG_FILE: &str = ".rowdiff.toml";

/// Full rowdiff configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowdiffConfig {
    /// Diff settings
    pub diff: DiffConfig,

    /// Per-class row animations
    pub animations: RowAnimations,
}

/// Diff configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Which algorithm decides moved rows
    pub algorithm: DiffAlgorithm,

    /// What to do with repeated identity keys
    pub duplicates: DuplicatePolicy,

    /// Field of each JSON row holding its identity key
    /// Default: "id"
    pub key_field: String,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            algorithm: DiffAlgorithm::default(),
            duplicates: DuplicatePolicy::default(),
            key_field: "id".to_string(),
        }
    }
}

impl DiffConfig {
    /// Build a reconciler with these settings
    pub fn reconciler(&self) -> Reconciler {
        Reconciler::new()
            .with_algorithm(self.algorithm)
            .with_duplicate_policy(self.duplicates)
    }
}

impl RowdiffConfig {
    /// Load configuration from `dir`, falling back to global config
    pub fn load(dir: &Path) -> Result<Self> {
        let local_config = Self::local_config_path(dir);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Some(global_config) = Self::global_config_path() {
            if global_config.exists() {
                return Self::load_from_file(&global_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Get global config path (~/.config/rowdiff/config.toml)
    pub fn global_config_path() -> Option<PathBuf> {
        dirs_path().map(|p| p.join("config.toml"))
    }

    /// Get local config path
    pub fn local_config_path(dir: &Path) -> PathBuf {
        dir.join(LOCAL_CONFIG_FILE)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

/// Get rowdiff config directory path
fn dirs_path() -> Option<PathBuf> {
    // XDG_CONFIG_HOME first, then ~/.config
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
        .map(|p| p.join("rowdiff"))
}
