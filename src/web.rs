//! Browser bindings
//!
//! The render/UI layer (JS) owns the scene and input. It calls these exports
//! on collisions and button presses, calls `pump` once per animation frame
//! and reads `snapshot_json` to draw the HUD.

use wasm_bindgen::prelude::*;

use crate::audio::{BusLevels, SoundEffect, WebAudioBackend};
use crate::game::{Action, Game};
use crate::platform::{KeyValueStore, LocalStore, MemoryStore, SystemClock};
use crate::session::ShopItemKind;
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Jupiter Run core loaded");
}

#[wasm_bindgen]
pub struct JupiterRun {
    game: Game<WebAudioBackend>,
}

#[wasm_bindgen]
impl JupiterRun {
    /// Create the game; `tuning_json` may override balance values
    #[wasm_bindgen(constructor)]
    pub fn new(tuning_json: Option<String>) -> JupiterRun {
        let tuning = match tuning_json.as_deref().map(Tuning::from_json) {
            Some(Ok(tuning)) => tuning,
            Some(Err(e)) => {
                log::warn!("Ignoring tuning override: {}", e);
                Tuning::default()
            }
            None => Tuning::default(),
        };

        let store: Box<dyn KeyValueStore> = match LocalStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("{}; preferences will not persist", e);
                Box::new(MemoryStore::new())
            }
        };

        let game = Game::new(
            tuning,
            Box::new(SystemClock::new()),
            store,
            Box::new(|| WebAudioBackend::open(BusLevels::default())),
        );
        JupiterRun { game }
    }

    /// Per-frame timer pump
    pub fn pump(&mut self) {
        self.game.pump();
    }

    /// Call from the first user gesture (audio autoplay policy)
    pub fn init_audio(&mut self) -> bool {
        self.game.init_audio()
    }

    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.game.session().snapshot()).unwrap_or_default()
    }

    /// Shop items for this visit, as JSON
    pub fn shop_offers_json(&mut self) -> String {
        serde_json::to_string(&self.game.shop_offers()).unwrap_or_default()
    }

    pub fn start_game(&mut self) {
        self.game.init_audio();
        self.game.dispatch(Action::StartGame);
    }

    pub fn restart_game(&mut self) {
        self.game.init_audio();
        self.game.dispatch(Action::RestartGame);
    }

    pub fn take_damage(&mut self) {
        self.game.dispatch(Action::TakeDamage);
    }

    pub fn add_score(&mut self, amount: i32) {
        self.game.dispatch(Action::AddScore(amount as i64));
    }

    pub fn collect_gem(&mut self, value: u32) {
        self.game.dispatch(Action::CollectGem(value as u64));
    }

    pub fn collect_letter(&mut self, index: usize) {
        self.game.dispatch(Action::CollectLetter(index));
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.game.dispatch(Action::SetDistance(distance));
    }

    pub fn open_shop(&mut self) {
        self.game.dispatch(Action::OpenShop);
    }

    pub fn close_shop(&mut self) {
        self.game.dispatch(Action::CloseShop);
    }

    /// `kind` is one of DOUBLE_JUMP, MAX_LIFE, HEAL, IMMORTAL
    pub fn buy_item(&mut self, kind: &str, cost: u32) -> bool {
        let Some(kind) = ShopItemKind::from_str(kind) else {
            log::warn!("Unknown shop item: {}", kind);
            return false;
        };
        self.game.dispatch(Action::BuyItem {
            kind,
            cost: cost as u64,
        })
    }

    pub fn activate_immortality(&mut self) {
        self.game.dispatch(Action::ActivateImmortality);
    }

    pub fn set_nickname(&mut self, name: &str) {
        self.game.dispatch(Action::SetNickname(name.to_string()));
    }

    pub fn toggle_music(&mut self) {
        self.game.dispatch(Action::ToggleMusic);
    }

    pub fn toggle_sfx(&mut self) {
        self.game.dispatch(Action::ToggleSfx);
    }

    pub fn toggle_quality(&mut self) {
        self.game.dispatch(Action::ToggleQuality);
    }

    pub fn play_gem_collect(&mut self) {
        self.game.play_sfx(SoundEffect::GemCollect);
    }

    pub fn play_letter_collect(&mut self) {
        self.game.play_sfx(SoundEffect::LetterCollect);
    }

    pub fn play_jump(&mut self, is_double: bool) {
        let effect = if is_double {
            SoundEffect::DoubleJump
        } else {
            SoundEffect::Jump
        };
        self.game.play_sfx(effect);
    }

    pub fn play_damage(&mut self) {
        self.game.play_sfx(SoundEffect::Damage);
    }
}
