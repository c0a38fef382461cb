//! Player preferences and purchased upgrades
//!
//! The durable subset of a session. Persisted as a single JSON record and
//! restored once at startup; everything else in a session is run-scoped.

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_NICKNAME;
use crate::platform::KeyValueStore;

/// Rendering quality preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Quality {
    Low,
    #[default]
    High,
}

impl Quality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Low => "LOW",
            Quality::High => "HIGH",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Quality::Low),
            "high" => Some(Quality::High),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Quality::Low => Quality::High,
            Quality::High => Quality::Low,
        }
    }

    /// Whether the renderer runs its post-processing pass
    pub fn post_effects_enabled(&self) -> bool {
        matches!(self, Quality::High)
    }

    /// Device pixel ratio range (min, max) handed to the canvas
    pub fn pixel_ratio_range(&self) -> (f32, f32) {
        match self {
            Quality::Low => (0.5, 1.0),
            Quality::High => (1.0, 1.5),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub nickname: String,
    pub music_enabled: bool,
    pub sfx_enabled: bool,
    pub quality: Quality,
    /// One-time shop upgrade; survives across runs
    pub has_double_jump: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            nickname: DEFAULT_NICKNAME.to_string(),
            music_enabled: true,
            sfx_enabled: true,
            quality: Quality::High,
            has_double_jump: false,
        }
    }
}

impl Preferences {
    /// Storage key for the persisted record
    pub const STORAGE_KEY: &'static str = "jupiter_run_preferences";

    /// Load preferences; missing or corrupt records fall back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(prefs) => {
                    log::info!("Loaded preferences from storage");
                    return prefs;
                }
                Err(e) => log::warn!("Discarding unreadable preferences: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Could not read preferences: {}", e),
        }

        log::info!("Using default preferences");
        Self::default()
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> crate::Result<()> {
        let json = serde_json::to_string(self)?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::debug!("Preferences saved");
        Ok(())
    }
}
