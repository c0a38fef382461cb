//! Session actions
//!
//! Progression is a ratchet driven purely by collected pickups: each letter
//! raises speed, a full word either advances the level or ends the run.

use super::shop::ShopItemKind;
use super::state::{GameSession, GameStatus, SessionEvent};
use crate::consts::{COLLECTION_TARGET, NICKNAME_MAX_CHARS};

impl GameSession {
    /// Begin a run from the menu. Purchased abilities carry over from
    /// earlier runs instead of being cleared.
    pub fn start_game(&mut self) {
        self.begin_run();
        log::info!("Run started ({})", self.nickname);
    }

    /// Begin a fresh run from the game-over or victory screen
    pub fn restart_game(&mut self) {
        self.begin_run();
        log::info!("Run restarted ({})", self.nickname);
    }

    fn begin_run(&mut self) {
        if self.music_enabled {
            self.emit(SessionEvent::MusicStart);
        }
        self.reset_run();
    }

    /// Obstacle hit. Absorbed entirely while immortal.
    pub fn take_damage(&mut self) {
        if self.status != GameStatus::Playing || self.is_immortality_active {
            return;
        }

        if self.lives > 1 {
            self.lives -= 1;
            log::debug!("Hit! {} lives left", self.lives);
        } else {
            self.lives = 0;
            self.speed = 0.0;
            self.status = GameStatus::GameOver;
            self.emit(SessionEvent::MusicStop);
            self.emit(SessionEvent::GameOver);
            log::info!("Game over at level {} with score {}", self.level, self.score);
        }
    }

    /// Apply a signed score delta; the score never drops below zero
    pub fn add_score(&mut self, amount: i64) {
        if !self.status.is_in_run() {
            return;
        }
        self.score = self.score.saturating_add_signed(amount);
    }

    pub fn collect_gem(&mut self, value: u64) {
        if !self.status.is_in_run() {
            return;
        }
        self.score = self.score.saturating_add(value);
        self.gems_collected += 1;
    }

    /// Pick up a letter of the collection target. Duplicates are ignored.
    pub fn collect_letter(&mut self, index: usize) {
        if !self.status.is_in_run()
            || index >= COLLECTION_TARGET.len()
            || self.collected_letters.contains(&index)
        {
            return;
        }

        self.collected_letters.push(index);
        self.speed += self.tuning.letter_speed_step();
        log::debug!(
            "Letter {} collected ({}/{})",
            COLLECTION_TARGET[index],
            self.collected_letters.len(),
            COLLECTION_TARGET.len()
        );

        if self.collected_letters.len() == COLLECTION_TARGET.len() {
            if self.level < self.tuning.max_level {
                self.advance_level();
            } else {
                self.score = self.score.saturating_add(self.tuning.victory_bonus);
                self.status = GameStatus::Victory;
                self.emit(SessionEvent::MusicStop);
                self.emit(SessionEvent::Victory);
                log::info!("Victory! Final score {}", self.score);
            }
        }
    }

    /// Move to the next level: more lanes, more speed, letters reset
    pub fn advance_level(&mut self) {
        if !self.status.is_in_run() || self.level >= self.tuning.max_level {
            return;
        }

        self.level += 1;
        self.lane_count = (self.lane_count + self.tuning.lanes_per_level).min(self.tuning.max_lanes);
        self.speed += self.tuning.level_speed_step();
        self.collected_letters.clear();
        self.status = GameStatus::Playing;
        self.emit(SessionEvent::LevelUp(self.level));
        log::info!("Level {} ({} lanes)", self.level, self.lane_count);
    }

    /// Render-layer odometer
    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.max(0.0);
    }

    pub fn open_shop(&mut self) {
        if self.status == GameStatus::Playing {
            self.status = GameStatus::Shop;
        }
    }

    pub fn close_shop(&mut self) {
        if self.status == GameStatus::Shop {
            self.status = GameStatus::Playing;
        }
    }

    /// Spend `cost` score on an item. Returns false (and changes nothing)
    /// when the score does not cover it or no run is live.
    pub fn buy_item(&mut self, kind: ShopItemKind, cost: u64) -> bool {
        if !self.status.is_in_run() || self.score < cost {
            return false;
        }

        self.score -= cost;
        match kind {
            ShopItemKind::DoubleJump => self.has_double_jump = true,
            ShopItemKind::MaxLife => {
                self.max_lives += 1;
                self.lives += 1;
            }
            ShopItemKind::Heal => self.lives = (self.lives + 1).min(self.max_lives),
            ShopItemKind::Immortal => self.has_immortality = true,
        }
        log::info!("Bought {:?} for {}", kind, cost);
        true
    }

    /// Raise the shield for a fixed wall-clock duration. Ignored while the
    /// shield is already up; the running timer is never extended.
    pub fn activate_immortality(&mut self, now_ms: f64) {
        if !self.has_immortality || self.is_immortality_active {
            return;
        }

        self.is_immortality_active = true;
        self.immortality_timer
            .arm(now_ms, self.tuning.immortality_duration_ms);
        self.emit(SessionEvent::ImmortalityStarted);
        log::debug!("Immortality active");
    }

    /// Fire any due session timers
    pub fn update_timers(&mut self, now_ms: f64) {
        if self.immortality_timer.fire(now_ms) {
            self.is_immortality_active = false;
            self.emit(SessionEvent::ImmortalityEnded);
            log::debug!("Immortality expired");
        }
    }

    pub fn set_nickname(&mut self, name: &str) {
        // Upper-casing can expand a char, so cap afterwards
        self.nickname = name.to_uppercase().chars().take(NICKNAME_MAX_CHARS).collect();
    }

    pub fn toggle_music(&mut self) {
        self.music_enabled = !self.music_enabled;
        if self.music_enabled && self.status == GameStatus::Playing {
            self.emit(SessionEvent::MusicStart);
        } else {
            self.emit(SessionEvent::MusicStop);
        }
    }

    pub fn toggle_sfx(&mut self) {
        self.sfx_enabled = !self.sfx_enabled;
    }

    pub fn toggle_quality(&mut self) {
        self.quality = self.quality.toggled();
    }
}
