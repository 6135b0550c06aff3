// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Configuration management for the image renamer

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::filter::ImageFilter;

/// Main application configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    /// Naming and filtering rules
    #[serde(default)]
    pub rules: RuleConfig,

    /// Rename history (undo log)
    #[serde(default)]
    pub history: HistoryConfig,

    /// Terminal presentation
    #[serde(default)]
    pub ui: UiConfig,
}

/// What to do when a single rename fails mid-batch
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failure, leaving earlier renames in place
    #[default]
    Abort,
    /// Record the failure and keep going
    Continue,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RuleConfig {
    /// Recognised image extensions (case-insensitive, leading dot optional)
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Text placed between the base name and the sequence number
    #[serde(default = "default_separator")]
    pub separator: String,
    /// Sequence number of the first file
    #[serde(default = "default_start_index")]
    pub start_index: usize,
    #[serde(default)]
    pub on_failure: FailurePolicy,
    /// Refuse a plan whose destinations would overwrite other files
    #[serde(default)]
    pub collision_check: bool,
    /// Leave directories out of the candidate list
    #[serde(default)]
    pub skip_directories: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HistoryConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_history_path")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub banner: bool,
    #[serde(default = "default_true")]
    pub colors: bool,
    /// Pause before the first rename so the spinner is visible
    #[serde(default = "default_spinner_delay")]
    pub spinner_delay_ms: u64,
    /// Pause after each rename
    #[serde(default = "default_step_delay")]
    pub step_delay_ms: u64,
}

// Default value functions
fn default_separator() -> String { " - ".to_string() }
fn default_start_index() -> usize { 1 }
fn default_history_path() -> String { "img-renamer-history.jsonl".to_string() }
fn default_true() -> bool { true }
fn default_spinner_delay() -> u64 { 800 }
fn default_step_delay() -> u64 { 50 }

fn default_extensions() -> Vec<String> {
    vec!["jpg", "jpeg", "png", "gif", "webp", "bmp", "svg", "tiff"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            separator: default_separator(),
            start_index: default_start_index(),
            on_failure: FailurePolicy::default(),
            collision_check: false,
            skip_directories: false,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_history_path(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            banner: true,
            colors: true,
            spinner_delay_ms: default_spinner_delay(),
            step_delay_ms: default_step_delay(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = serde_json::from_str(&content).map_err(|e| {
                crate::RenamerError::Config(format!("Failed to parse config: {}", e))
            })?;
            config.validate()?;
            Ok(config)
        } else {
            tracing::info!("Config file not found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings that would produce unusable file names
    pub fn validate(&self) -> crate::Result<()> {
        if ImageFilter::new(&self.rules.extensions).extensions().is_empty() {
            return Err(crate::RenamerError::Config(
                "rules.extensions must list at least one extension".to_string(),
            ));
        }
        if self.rules.separator.contains(['/', '\\']) {
            return Err(crate::RenamerError::Config(
                "rules.separator must not contain path separators".to_string(),
            ));
        }
        Ok(())
    }
}
