use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::RelayError;

/// Default capacity of the in-session run history.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Default number of prompt characters kept in a history entry.
pub const DEFAULT_PROMPT_PREVIEW_CHARS: usize = 80;

/// How [`RelayConfig::load_or_create`] obtained its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    File,
    CreatedDefault,
}

// ---------------------------------------------------------------------------
// RelayConfig
// ---------------------------------------------------------------------------

/// Application configuration stored at `~/.relay/config.json`.
///
/// Only start-up defaults live here. Weights, history and model selection of a
/// running session are never written back to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    // Priority defaults applied to a fresh session
    pub default_cost_weight: f64,
    pub default_latency_weight: f64,
    pub default_quality_weight: f64,
    pub default_profile_name: String,

    // Session
    pub history_capacity: usize,
    pub prompt_preview_chars: usize,
    pub default_max_tokens: u32,
    pub simulate_delay: bool,

    // Settings export target; `None` means the current directory.
    pub export_dir: Option<PathBuf>,

    // General
    pub log_level: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            default_cost_weight: 0.4,
            default_latency_weight: 0.3,
            default_quality_weight: 0.3,
            default_profile_name: "rules".into(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            prompt_preview_chars: DEFAULT_PROMPT_PREVIEW_CHARS,
            default_max_tokens: 512,
            simulate_delay: true,
            export_dir: None,
            log_level: "info".into(),
        }
    }
}

impl RelayConfig {
    /// Returns the base config directory: `~/.relay/`
    pub fn base_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".relay"))
    }

    /// Returns the config file path: `~/.relay/config.json`
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("config.json"))
    }

    /// Returns the logs directory: `~/.relay/logs/`
    pub fn logs_dir() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("logs"))
    }

    /// Load config from `path`, writing defaults when the file does not
    /// exist yet. Nothing is logged here: the caller reports the
    /// [`ConfigOrigin`] once its subscriber is installed.
    pub fn load_or_create(path: &Path) -> Result<(Self, ConfigOrigin)> {
        let (config, origin) = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let config: Self = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            (config, ConfigOrigin::File)
        } else {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory: {}", parent.display())
                })?;
            }
            let config = Self::default();
            config.save_to_path(path)?;
            (config, ConfigOrigin::CreatedDefault)
        };
        config.validate()?;
        Ok((config, origin))
    }

    /// Save config to a specific file path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Check invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), RelayError> {
        if self.history_capacity == 0 {
            return Err(RelayError::Config(
                "history_capacity must be at least 1".into(),
            ));
        }
        let weights = [
            ("default_cost_weight", self.default_cost_weight),
            ("default_latency_weight", self.default_latency_weight),
            ("default_quality_weight", self.default_quality_weight),
        ];
        for (field, value) in weights {
            if !value.is_finite() {
                return Err(RelayError::Config(format!("{field} must be a finite number")));
            }
        }
        Ok(())
    }

    /// Directory settings files are exported to.
    pub fn export_dir_or_cwd(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
