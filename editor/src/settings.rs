//! Editor settings management
//!
//! This module provides persistent settings storage for the editor,
//! including the scene navigator's active tag filter.

use engine::navigator::{encode_selection, load_selection_or_default, ActiveSelection, MatchMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Main editor settings structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorSettings {
    /// Scene navigator settings
    #[serde(default)]
    pub navigator: NavigatorSettings,

    /// Settings version for future migration support
    #[serde(default)]
    pub version: u32,
}

/// Persisted scene navigator filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigatorSettings {
    /// Active tags joined by NUL
    #[serde(default)]
    pub selection: String,
    /// How the active tags combine
    #[serde(default)]
    pub match_mode: MatchMode,
}

impl NavigatorSettings {
    /// Capture the given selection
    pub fn from_selection(selection: &ActiveSelection) -> Self {
        Self {
            selection: encode_selection(&selection.tags),
            match_mode: selection.mode,
        }
    }

    /// Restore the persisted selection; a corrupt token yields no active tags
    pub fn to_selection(&self) -> ActiveSelection {
        ActiveSelection {
            tags: load_selection_or_default(Some(&self.selection)),
            mode: self.match_mode,
        }
    }
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            navigator: NavigatorSettings::default(),
            version: 1,
        }
    }
}

impl EditorSettings {
    /// Get the default path for the settings file
    pub fn default_path() -> PathBuf {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join("editor_settings.json")
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.save_to(Self::default_path())
    }

    /// Load settings from the default location, falling back to defaults
    pub fn load() -> Self {
        Self::load_or_default_from(Self::default_path())
    }

    /// Save settings to a specific path
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        info!("Saved editor settings to {:?}", path.as_ref());
        Ok(())
    }

    /// Load settings from a specific path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(&path)?;
        let settings = serde_json::from_str(&content)?;
        info!("Loaded editor settings from {:?}", path.as_ref());
        Ok(settings)
    }

    /// Load settings from a specific path, using defaults if the file is
    /// missing or unreadable
    pub fn load_or_default_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Failed to load settings file: {}. Using defaults.", e);
                Self::default()
            }
        }
    }
}
