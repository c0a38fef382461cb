//! Jupiter Run - A lane runner's progression and audio core
//!
//! Core modules:
//! - `session`: Game progression state machine (score, lives, letters, shop)
//! - `audio`: Look-ahead music sequencer and procedural sound effects
//! - `game`: Context object that owns a session, an audio engine and storage
//! - `platform`: Browser/native abstraction (clock, timers, storage)
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod error;
pub mod game;
pub mod platform;
pub mod preferences;
pub mod session;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::{Error, Result};
pub use game::{Action, Game};
pub use preferences::{Preferences, Quality};
pub use session::{GameSession, GameStatus, SessionEvent, SessionSnapshot, ShopItemKind};
pub use tuning::Tuning;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Forward speed at the start of a run (world units/s)
    pub const RUN_SPEED_BASE: f32 = 22.5;
    /// Speed bonus per collected letter, as a fraction of base speed
    pub const LETTER_SPEED_BONUS: f32 = 0.10;
    /// Speed bonus per level advance, as a fraction of base speed
    pub const LEVEL_SPEED_BONUS: f32 = 0.40;

    /// Lives at the start of a run
    pub const START_LIVES: u32 = 3;

    /// Level progression
    pub const MAX_LEVEL: u32 = 3;
    pub const START_LANES: u32 = 3;
    pub const LANES_PER_LEVEL: u32 = 2;
    pub const MAX_LANES: u32 = 9;

    /// Letters to collect on every level
    pub const COLLECTION_TARGET: [char; 7] = ['J', 'U', 'P', 'I', 'T', 'E', 'R'];
    /// Score awarded for completing the final level
    pub const VICTORY_BONUS: u64 = 5000;

    /// Immortality buff lifetime (wall clock)
    pub const IMMORTALITY_DURATION_MS: f64 = 5000.0;

    pub const NICKNAME_MAX_CHARS: usize = 12;
    pub const DEFAULT_NICKNAME: &str = "PLAYER";

    /// Music tempo (beats per minute)
    pub const MUSIC_TEMPO_BPM: f64 = 110.0;
}

