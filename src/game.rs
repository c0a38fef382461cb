//! Game context
//!
//! One authoritative owner for a session, its audio engine, the wall clock
//! and durable storage. Every action goes through [`Game::dispatch`], which
//! applies it to the session, routes the session's signals to audio and
//! saves the preference record when it changed.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio::{AudioBackend, AudioEngine, BackendOpener, SoundEffect};
use crate::platform::{Clock, KeyValueStore};
use crate::preferences::Preferences;
use crate::session::{GameSession, SessionEvent, ShopItemKind, ShopOffer, shop_offers};
use crate::tuning::Tuning;

/// Input commands from the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    StartGame,
    RestartGame,
    TakeDamage,
    AddScore(i64),
    CollectGem(u64),
    CollectLetter(usize),
    AdvanceLevel,
    SetDistance(f32),
    OpenShop,
    CloseShop,
    BuyItem { kind: ShopItemKind, cost: u64 },
    ActivateImmortality,
    SetNickname(String),
    ToggleMusic,
    ToggleSfx,
    ToggleQuality,
}

pub struct Game<B: AudioBackend> {
    session: GameSession,
    audio: AudioEngine<B>,
    clock: Box<dyn Clock>,
    store: Box<dyn KeyValueStore>,
    /// Last record written to (or read from) storage
    saved: Preferences,
    shop_rng: Pcg32,
    /// Session signals not yet collected by the host
    events: Vec<SessionEvent>,
}

impl<B: AudioBackend> Game<B> {
    /// Restore preferences from `store` and build a session in the menu
    pub fn new(
        tuning: Tuning,
        clock: Box<dyn Clock>,
        store: Box<dyn KeyValueStore>,
        opener: BackendOpener<B>,
    ) -> Self {
        let prefs = Preferences::load(store.as_ref());
        let mut audio = AudioEngine::new(opener).with_tempo(tuning.music_tempo_bpm);
        audio.set_sfx_enabled(prefs.sfx_enabled);
        let shop_rng = Pcg32::seed_from_u64(clock.now_ms().to_bits());

        Self {
            session: GameSession::new(tuning, prefs.clone()),
            audio,
            clock,
            store,
            saved: prefs,
            shop_rng,
            events: Vec::new(),
        }
    }

    /// Fix the shop RNG seed (reproducible offers)
    pub fn with_shop_seed(mut self, seed: u64) -> Self {
        self.shop_rng = Pcg32::seed_from_u64(seed);
        self
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn audio(&self) -> &AudioEngine<B> {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut AudioEngine<B> {
        &mut self.audio
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    /// Apply an action. Returns false only for a declined purchase.
    pub fn dispatch(&mut self, action: Action) -> bool {
        let now = self.clock.now_ms();
        let mut accepted = true;

        match action {
            Action::StartGame => self.session.start_game(),
            Action::RestartGame => self.session.restart_game(),
            Action::TakeDamage => self.session.take_damage(),
            Action::AddScore(amount) => self.session.add_score(amount),
            Action::CollectGem(value) => self.session.collect_gem(value),
            Action::CollectLetter(index) => self.session.collect_letter(index),
            Action::AdvanceLevel => self.session.advance_level(),
            Action::SetDistance(distance) => self.session.set_distance(distance),
            Action::OpenShop => self.session.open_shop(),
            Action::CloseShop => self.session.close_shop(),
            Action::BuyItem { kind, cost } => accepted = self.session.buy_item(kind, cost),
            Action::ActivateImmortality => self.session.activate_immortality(now),
            Action::SetNickname(name) => self.session.set_nickname(&name),
            Action::ToggleMusic => self.session.toggle_music(),
            Action::ToggleSfx => self.session.toggle_sfx(),
            Action::ToggleQuality => self.session.toggle_quality(),
        }

        self.sync(now);
        accepted
    }

    /// Fire due timers (immortality expiry, music poll). Call every frame.
    pub fn pump(&mut self) {
        let now = self.clock.now_ms();
        self.session.update_timers(now);
        self.audio.pump(now);
        self.sync(now);
    }

    /// Open audio from a user gesture (browsers block it before one)
    pub fn init_audio(&mut self) -> bool {
        self.audio.init()
    }

    /// One-shot effect for a gameplay event detected by the render layer
    pub fn play_sfx(&mut self, effect: SoundEffect) {
        self.audio.play(effect);
    }

    /// Roll the items for a shop visit
    pub fn shop_offers(&mut self) -> Vec<ShopOffer> {
        shop_offers(&self.session, &mut self.shop_rng)
    }

    /// Session signals since the last call, oldest first
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    fn sync(&mut self, now: f64) {
        for event in self.session.drain_events() {
            match event {
                SessionEvent::MusicStart => self.audio.start_music(now),
                SessionEvent::MusicStop => self.audio.stop_music(),
                _ => {}
            }
            self.events.push(event);
        }
        self.audio.set_sfx_enabled(self.session.sfx_enabled());
        self.persist();
    }

    /// Save the durable subset if it differs from what storage holds
    fn persist(&mut self) {
        let prefs = self.session.preferences();
        if prefs == self.saved {
            return;
        }
        match prefs.save(self.store.as_mut()) {
            Ok(()) => self.saved = prefs,
            Err(e) => log::warn!("Failed to save preferences: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{Bus, OfflineBackend};
    use crate::platform::{ManualClock, MemoryStore};
    use crate::session::GameStatus;

    fn game_with(clock: &ManualClock, store: MemoryStore) -> Game<OfflineBackend> {
        let audio_clock = clock.clone();
        Game::new(
            Tuning::default(),
            Box::new(clock.clone()),
            Box::new(store),
            Box::new(move || -> crate::Result<OfflineBackend> {
                Ok(OfflineBackend::new(Box::new(audio_clock.clone())))
            }),
        )
        .with_shop_seed(11)
    }

    #[test]
    fn test_start_game_starts_music() {
        let clock = ManualClock::new(0.0);
        let mut game = game_with(&clock, MemoryStore::new());
        game.dispatch(Action::StartGame);
        assert_eq!(game.session().status(), GameStatus::Playing);
        assert!(game.audio().is_playing_music());
        assert_eq!(game.take_events(), vec![SessionEvent::MusicStart]);
    }

    #[test]
    fn test_game_over_stops_music() {
        let clock = ManualClock::new(0.0);
        let mut game = game_with(&clock, MemoryStore::new());
        game.dispatch(Action::StartGame);
        for _ in 0..3 {
            game.dispatch(Action::TakeDamage);
        }
        assert_eq!(game.session().status(), GameStatus::GameOver);
        assert!(!game.audio().is_playing_music());
        assert_eq!(game.audio().next_poll_ms(), None);
    }

    #[test]
    fn test_toggle_music_mid_run() {
        let clock = ManualClock::new(0.0);
        let mut game = game_with(&clock, MemoryStore::new());
        game.dispatch(Action::StartGame);
        game.dispatch(Action::ToggleMusic);
        assert!(!game.audio().is_playing_music());
        game.dispatch(Action::ToggleMusic);
        assert!(game.audio().is_playing_music());
    }

    #[test]
    fn test_music_disabled_run_is_silent() {
        let clock = ManualClock::new(0.0);
        let mut game = game_with(&clock, MemoryStore::new());
        game.dispatch(Action::ToggleMusic);
        game.dispatch(Action::StartGame);
        assert!(!game.audio().is_playing_music());
    }

    #[test]
    fn test_pump_drives_music_and_shield() {
        let clock = ManualClock::new(0.0);
        let mut game = game_with(&clock, MemoryStore::new());
        game.dispatch(Action::StartGame);
        game.dispatch(Action::CollectGem(3000));
        assert!(game.dispatch(Action::BuyItem {
            kind: ShopItemKind::Immortal,
            cost: 3000,
        }));
        game.dispatch(Action::ActivateImmortality);

        for _ in 0..200 {
            clock.advance(25.0);
            game.pump();
        }
        assert!(!game.session().is_immortality_active());
        assert!(game.take_events().contains(&SessionEvent::ImmortalityEnded));

        let music = game
            .audio()
            .backend()
            .map(|b| b.played().iter().filter(|(bus, _)| *bus == Bus::Music).count())
            .unwrap_or(0);
        assert!(music > 30);
    }

    #[test]
    fn test_sfx_follow_preference() {
        let clock = ManualClock::new(0.0);
        let mut game = game_with(&clock, MemoryStore::new());
        game.dispatch(Action::ToggleSfx);
        game.play_sfx(SoundEffect::GemCollect);
        assert!(!game.audio().is_initialized());

        game.dispatch(Action::ToggleSfx);
        game.play_sfx(SoundEffect::LetterCollect);
        assert_eq!(game.audio().backend().map(|b| b.played().len()), Some(3));
    }

    #[test]
    fn test_preferences_persist_on_change() {
        let clock = ManualClock::new(0.0);
        let mut game = game_with(&clock, MemoryStore::new());
        game.dispatch(Action::SetNickname("rocket".into()));
        game.dispatch(Action::ToggleQuality);
        game.dispatch(Action::StartGame);
        game.dispatch(Action::CollectGem(1000));
        game.dispatch(Action::BuyItem {
            kind: ShopItemKind::DoubleJump,
            cost: 1000,
        });

        let saved = Preferences::load(game.store.as_ref());
        assert_eq!(saved, game.session().preferences());
        assert_eq!(saved.nickname, "ROCKET");
        assert!(saved.has_double_jump);
    }

    #[test]
    fn test_restores_preferences_at_startup() {
        let mut store = MemoryStore::new();
        Preferences {
            nickname: "ACE".into(),
            sfx_enabled: false,
            has_double_jump: true,
            ..Preferences::default()
        }
        .save(&mut store)
        .unwrap();

        let clock = ManualClock::new(0.0);
        let game = game_with(&clock, store);
        assert_eq!(game.session().nickname(), "ACE");
        assert!(game.session().has_double_jump());
        assert!(!game.audio().sfx_enabled());
    }

    #[test]
    fn test_declined_purchase() {
        let clock = ManualClock::new(0.0);
        let mut game = game_with(&clock, MemoryStore::new());
        game.dispatch(Action::StartGame);
        assert!(!game.dispatch(Action::BuyItem {
            kind: ShopItemKind::Heal,
            cost: 1000,
        }));
    }

    #[test]
    fn test_shop_offers_rolled_from_context() {
        let clock = ManualClock::new(0.0);
        let mut game = game_with(&clock, MemoryStore::new());
        game.dispatch(Action::StartGame);
        game.dispatch(Action::OpenShop);
        let offers = game.shop_offers();
        assert_eq!(offers.len(), 3);
    }
}
