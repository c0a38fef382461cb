//! Data-driven game balance
//!
//! Every progression constant lives here so balance passes do not touch the
//! state machine. Defaults mirror [`crate::consts`]; a JSON file may override
//! any subset of fields.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::session::ShopItemKind;

/// Shop prices (score cost per item)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopPrices {
    pub double_jump: u64,
    pub max_life: u64,
    pub heal: u64,
    pub immortal: u64,
}

impl Default for ShopPrices {
    fn default() -> Self {
        Self {
            double_jump: 1000,
            max_life: 1500,
            heal: 1000,
            immortal: 3000,
        }
    }
}

impl ShopPrices {
    pub fn cost_of(&self, kind: ShopItemKind) -> u64 {
        match kind {
            ShopItemKind::DoubleJump => self.double_jump,
            ShopItemKind::MaxLife => self.max_life,
            ShopItemKind::Heal => self.heal,
            ShopItemKind::Immortal => self.immortal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Forward speed when a run starts
    pub base_speed: f32,
    /// Fraction of base speed added per letter
    pub letter_speed_bonus: f32,
    /// Fraction of base speed added per level advance
    pub level_speed_bonus: f32,
    pub start_lives: u32,
    pub max_level: u32,
    pub start_lanes: u32,
    pub lanes_per_level: u32,
    pub max_lanes: u32,
    pub victory_bonus: u64,
    pub immortality_duration_ms: f64,
    pub shop: ShopPrices,
    pub music_tempo_bpm: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_speed: RUN_SPEED_BASE,
            letter_speed_bonus: LETTER_SPEED_BONUS,
            level_speed_bonus: LEVEL_SPEED_BONUS,
            start_lives: START_LIVES,
            max_level: MAX_LEVEL,
            start_lanes: START_LANES,
            lanes_per_level: LANES_PER_LEVEL,
            max_lanes: MAX_LANES,
            victory_bonus: VICTORY_BONUS,
            immortality_duration_ms: IMMORTALITY_DURATION_MS,
            shop: ShopPrices::default(),
            music_tempo_bpm: MUSIC_TEMPO_BPM,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning document
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let tuning: Self = serde_json::from_str(json)?;
        log::debug!("Loaded tuning: {:?}", tuning);
        Ok(tuning)
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Speed gained by collecting one letter
    pub fn letter_speed_step(&self) -> f32 {
        self.base_speed * self.letter_speed_bonus
    }

    /// Speed gained by advancing one level
    pub fn level_speed_step(&self) -> f32 {
        self.base_speed * self.level_speed_bonus
    }

    /// Lane count for a level: grows by `lanes_per_level` per level, capped.
    pub fn lanes_for_level(&self, level: u32) -> u32 {
        (self.start_lanes + self.lanes_per_level * level.saturating_sub(1)).min(self.max_lanes)
    }
}
