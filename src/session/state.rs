//! Session state and read-only views
//!
//! Fields are private; the render layer reads them through accessors or an
//! owned [`SessionSnapshot`].

use serde::{Deserialize, Serialize};

use crate::consts::COLLECTION_TARGET;
use crate::platform::TimerSlot;
use crate::preferences::{Preferences, Quality};
use crate::tuning::Tuning;

/// Which screen the presentation layer should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    #[default]
    Menu,
    Playing,
    Shop,
    GameOver,
    Victory,
}

impl GameStatus {
    /// Run has ended (win or lose)
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameStatus::GameOver | GameStatus::Victory)
    }

    /// A run is live: pickups, level changes and purchases apply
    pub fn is_in_run(&self) -> bool {
        matches!(self, GameStatus::Playing | GameStatus::Shop)
    }
}

/// Signals raised by actions for the owning context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    MusicStart,
    MusicStop,
    /// Reached the given level
    LevelUp(u32),
    Victory,
    GameOver,
    ImmortalityStarted,
    ImmortalityEnded,
}

/// The full mutable record of one play-through plus durable preferences
#[derive(Debug, Clone)]
pub struct GameSession {
    pub(super) tuning: Tuning,

    pub(super) status: GameStatus,
    pub(super) score: u64,
    pub(super) lives: u32,
    pub(super) max_lives: u32,
    pub(super) speed: f32,
    /// Indices into the collection target, in pickup order
    pub(super) collected_letters: Vec<usize>,
    pub(super) level: u32,
    pub(super) lane_count: u32,
    pub(super) gems_collected: u32,
    pub(super) distance: f32,

    pub(super) nickname: String,
    pub(super) music_enabled: bool,
    pub(super) sfx_enabled: bool,
    pub(super) quality: Quality,

    pub(super) has_double_jump: bool,
    pub(super) has_immortality: bool,
    pub(super) is_immortality_active: bool,
    pub(super) immortality_timer: TimerSlot,

    pub(super) events: Vec<SessionEvent>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(Tuning::default(), Preferences::default())
    }
}

impl GameSession {
    /// Fresh session in the menu, with restored preferences
    pub fn new(tuning: Tuning, prefs: Preferences) -> Self {
        Self {
            status: GameStatus::Menu,
            score: 0,
            lives: tuning.start_lives,
            max_lives: tuning.start_lives,
            speed: 0.0,
            collected_letters: Vec::with_capacity(COLLECTION_TARGET.len()),
            level: 1,
            lane_count: tuning.start_lanes,
            gems_collected: 0,
            distance: 0.0,
            nickname: prefs.nickname,
            music_enabled: prefs.music_enabled,
            sfx_enabled: prefs.sfx_enabled,
            quality: prefs.quality,
            has_double_jump: prefs.has_double_jump,
            has_immortality: false,
            is_immortality_active: false,
            immortality_timer: TimerSlot::new(),
            events: Vec::new(),
            tuning,
        }
    }

    /// Reset every run-scoped field; preferences and purchased abilities stay
    pub(super) fn reset_run(&mut self) {
        self.status = GameStatus::Playing;
        self.score = 0;
        self.lives = self.tuning.start_lives;
        self.max_lives = self.tuning.start_lives;
        self.speed = self.tuning.base_speed;
        self.collected_letters.clear();
        self.level = 1;
        self.lane_count = self.tuning.start_lanes;
        self.gems_collected = 0;
        self.distance = 0.0;
        self.is_immortality_active = false;
        self.immortality_timer.cancel();
    }

    pub(super) fn emit(&mut self, event: SessionEvent) {
        self.events.push(event);
    }

    /// Take all queued events, oldest first
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    // === Read access ===

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn max_lives(&self) -> u32 {
        self.max_lives
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Current speed as a percentage of the base speed (HUD readout)
    pub fn speed_percent(&self) -> u32 {
        if self.tuning.base_speed <= 0.0 {
            return 0;
        }
        (self.speed / self.tuning.base_speed * 100.0).round() as u32
    }

    pub fn collected_letters(&self) -> &[usize] {
        &self.collected_letters
    }

    pub fn has_letter(&self, index: usize) -> bool {
        self.collected_letters.contains(&index)
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lane_count(&self) -> u32 {
        self.lane_count
    }

    pub fn gems_collected(&self) -> u32 {
        self.gems_collected
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn music_enabled(&self) -> bool {
        self.music_enabled
    }

    pub fn sfx_enabled(&self) -> bool {
        self.sfx_enabled
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    pub fn has_double_jump(&self) -> bool {
        self.has_double_jump
    }

    pub fn has_immortality(&self) -> bool {
        self.has_immortality
    }

    pub fn is_immortality_active(&self) -> bool {
        self.is_immortality_active
    }

    /// Milliseconds of shield left, if active
    pub fn immortality_remaining_ms(&self, now_ms: f64) -> Option<f64> {
        if !self.is_immortality_active {
            return None;
        }
        self.immortality_timer.remaining_ms(now_ms)
    }

    /// The durable subset, as written to storage
    pub fn preferences(&self) -> Preferences {
        Preferences {
            nickname: self.nickname.clone(),
            music_enabled: self.music_enabled,
            sfx_enabled: self.sfx_enabled,
            quality: self.quality,
            has_double_jump: self.has_double_jump,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            score: self.score,
            lives: self.lives,
            max_lives: self.max_lives,
            speed: self.speed,
            speed_percent: self.speed_percent(),
            collected_letters: self.collected_letters.clone(),
            target: COLLECTION_TARGET.iter().collect(),
            level: self.level,
            max_level: self.tuning.max_level,
            lane_count: self.lane_count,
            gems_collected: self.gems_collected,
            distance: self.distance,
            nickname: self.nickname.clone(),
            has_double_jump: self.has_double_jump,
            has_immortality: self.has_immortality,
            is_immortality_active: self.is_immortality_active,
            music_enabled: self.music_enabled,
            sfx_enabled: self.sfx_enabled,
            quality: self.quality,
        }
    }
}

/// Owned per-frame view handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub status: GameStatus,
    pub score: u64,
    pub lives: u32,
    pub max_lives: u32,
    pub speed: f32,
    pub speed_percent: u32,
    pub collected_letters: Vec<usize>,
    /// Collection target spelled out for the HUD
    pub target: String,
    pub level: u32,
    pub max_level: u32,
    pub lane_count: u32,
    pub gems_collected: u32,
    pub distance: f32,
    pub nickname: String,
    pub has_double_jump: bool,
    pub has_immortality: bool,
    pub is_immortality_active: bool,
    pub music_enabled: bool,
    pub sfx_enabled: bool,
    pub quality: Quality,
}
