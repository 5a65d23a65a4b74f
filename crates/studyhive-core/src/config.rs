//! TOML-based engine configuration.
//!
//! Stores the gamification tunables:
//! - XP award table per trigger
//! - AI quota ceilings and reset window
//! - Text-generation endpoint settings
//!
//! Configuration is stored at `~/.config/studyhive/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ConfigError, Result};
use crate::events::TriggerEvent;
use crate::quota::QuotaLimits;
use crate::store::data_dir;

/// XP awarded per trigger type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XpConfig {
    #[serde(default = "default_login_xp")]
    pub login: u64,
    #[serde(default = "default_note_upload_xp")]
    pub note_upload: u64,
    #[serde(default = "default_rating_given_xp")]
    pub rating_given: u64,
    #[serde(default = "default_note_downloaded_xp")]
    pub note_downloaded: u64,
    #[serde(default = "default_ai_summary_xp")]
    pub ai_summary: u64,
    #[serde(default = "default_ai_flashcards_xp")]
    pub ai_flashcards: u64,
}

impl XpConfig {
    /// XP awarded for a trigger.
    pub fn award_for(&self, event: &TriggerEvent) -> u64 {
        match event {
            TriggerEvent::Login => self.login,
            TriggerEvent::NoteCreated { .. } => self.note_upload,
            TriggerEvent::RatingGiven { .. } => self.rating_given,
            TriggerEvent::NoteDownloaded { .. } => self.note_downloaded,
            TriggerEvent::AiSummaryGenerated => self.ai_summary,
            TriggerEvent::AiFlashcardsGenerated => self.ai_flashcards,
        }
    }
}

/// Text-generation endpoint settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// HTTP endpoint of the text-generation service.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Model identifier passed through to the service.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Engine configuration.
///
/// Serialized to/from TOML at `~/.config/studyhive/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub xp: XpConfig,
    #[serde(default)]
    pub quota: QuotaLimits,
    #[serde(default)]
    pub generation: GenerationConfig,
}

// Default functions
fn default_login_xp() -> u64 {
    5
}
fn default_note_upload_xp() -> u64 {
    25
}
fn default_rating_given_xp() -> u64 {
    10
}
fn default_note_downloaded_xp() -> u64 {
    5
}
fn default_ai_summary_xp() -> u64 {
    15
}
fn default_ai_flashcards_xp() -> u64 {
    15
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for XpConfig {
    fn default() -> Self {
        Self {
            login: default_login_xp(),
            note_upload: default_note_upload_xp(),
            rating_given: default_rating_given_xp(),
            note_downloaded: default_note_downloaded_xp(),
            ai_summary: default_ai_summary_xp(),
            ai_flashcards: default_ai_flashcards_xp(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            xp: XpConfig::default(),
            quota: QuotaLimits::default(),
            generation: GenerationConfig::default(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default (writing it out).
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content)?;
        Ok(())
    }
}
