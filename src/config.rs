use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::confirmation::StaleConfirmationPolicy;

/// Assistant configuration, read once at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Speech
    pub language: String,
    pub greeting: String,

    // Idle
    pub idle_threshold_secs: u64,
    pub idle_poll_secs: u64,

    // Dispatch
    pub confidence_overrides: HashMap<String, f32>,
    pub confirmation_required: Vec<String>,
    pub stale_confirmation: StaleConfirmationPolicy,

    // Transport
    pub mmi_url: String,

    // Meta
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            greeting: "Hello! I'm your map assistant. Where would you like to go?".to_string(),
            idle_threshold_secs: 120,
            idle_poll_secs: 5,
            confidence_overrides: HashMap::new(),
            confirmation_required: vec!["start_navigation".to_string()],
            stale_confirmation: StaleConfirmationPolicy::default(),
            mmi_url: "wss://127.0.0.1:8005/IM/USER1/APP".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load config from the default location, or defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load config from a file. A missing file yields defaults; a corrupt one
    /// is moved aside to `*.json.corrupt` and also yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        match serde_json::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!("⚠️ Config file corrupted or invalid, using defaults: {}", e);
                let backup_path = path.with_extension("json.corrupt");
                let _ = std::fs::rename(path, &backup_path);
                Ok(Self::default())
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("writing config {}", path.display()))?;
        Ok(())
    }

    pub fn idle_threshold(&self) -> Duration {
        Duration::from_secs(self.idle_threshold_secs)
    }

    /// Poll interval, never zero
    pub fn idle_poll_interval(&self) -> Duration {
        Duration::from_secs(self.idle_poll_secs.max(1))
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wayfinder")
        .join("config.json")
}
