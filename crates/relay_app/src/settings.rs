//! Settings export/import.
//!
//! A settings file is a JSON object `{ "name": ..., "priority": { "cost",
//! "latency", "quality" } }` written with 2-space indentation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use relay_ai::PriorityWeights;
use relay_core::RelayError;

/// File stem used when the profile name is blank.
pub const DEFAULT_SETTINGS_STEM: &str = "rules";

/// The exported settings document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingSettings {
    pub name: String,
    pub priority: PriorityWeights,
}

/// Fields found in an imported document. Absent fields leave the current
/// state alone.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SettingsPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub priority: Option<PriorityWeights>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.priority.is_none()
    }
}

impl RoutingSettings {
    pub fn new(name: impl Into<String>, priority: PriorityWeights) -> Self {
        Self {
            name: name.into(),
            priority,
        }
    }

    /// Serialize with 2-space indentation.
    pub fn to_json(&self) -> Result<String, RelayError> {
        serde_json::to_string_pretty(self).map_err(|e| RelayError::Internal(e.to_string()))
    }

    /// File name derived from the settings name.
    pub fn file_name(&self) -> String {
        export_file_name(&self.name)
    }

    /// Write the settings into `dir` and return the created path.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf, RelayError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        std::fs::write(&path, self.to_json()?)?;
        info!(path = %path.display(), "Exported settings");
        Ok(path)
    }
}

/// Sanitized export file name: whitespace runs and path separators become
/// `_`; a blank name falls back to `rules`. Always ends in `.json`.
pub fn export_file_name(name: &str) -> String {
    if name.trim().is_empty() {
        return format!("{DEFAULT_SETTINGS_STEM}.json");
    }

    let mut stem = String::with_capacity(name.len());
    let mut in_whitespace = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                stem.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        stem.push(if matches!(c, '/' | '\\') { '_' } else { c });
    }
    format!("{stem}.json")
}

/// Parse an imported settings document.
///
/// The document must be a JSON object. `name` must be a string and
/// `priority` must carry finite `cost`, `latency` and `quality` numbers when
/// present.
pub fn parse_settings(raw: &str) -> Result<SettingsPatch, RelayError> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(|e| {
        warn!("Rejected settings import: {e}");
        RelayError::InvalidSettings(format!("not valid JSON ({e})"))
    })?;

    if !value.is_object() {
        return Err(RelayError::InvalidSettings(
            "expected a JSON object".into(),
        ));
    }

    let patch: SettingsPatch = serde_json::from_value(value)
        .map_err(|e| RelayError::InvalidSettings(format!("unexpected field value ({e})")))?;

    if let Some(priority) = &patch.priority {
        if !priority.is_finite() {
            return Err(RelayError::InvalidSettings(
                "priority weights must be finite numbers".into(),
            ));
        }
    }

    Ok(patch)
}

/// Read and parse a settings file from disk.
pub fn read_settings_file(path: &Path) -> Result<SettingsPatch, RelayError> {
    let raw = std::fs::read_to_string(path)?;
    parse_settings(&raw)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
