//! Jupiter Run entry point
//!
//! The browser build is driven from JS through the `web` bindings. Natively
//! this runs a scripted headless play-through against the offline audio
//! backend and prints the final session.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Jupiter Run (native) starting...");

    let tuning = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| jupiter_run::Tuning::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(e) => {
                log::warn!("Using default tuning ({}: {})", path, e);
                jupiter_run::Tuning::default()
            }
        },
        None => jupiter_run::Tuning::default(),
    };

    headless::run(tuning);
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use jupiter_run::audio::{OfflineBackend, SoundEffect};
    use jupiter_run::consts::COLLECTION_TARGET;
    use jupiter_run::platform::{ManualClock, MemoryStore};
    use jupiter_run::{Action, Game, GameStatus, Tuning};

    /// Simulated frame length
    const FRAME_MS: f64 = 1000.0 / 60.0;

    pub fn run(tuning: Tuning) {
        let clock = ManualClock::new(0.0);
        let audio_clock = clock.clone();
        let mut game: Game<OfflineBackend> = Game::new(
            tuning,
            Box::new(clock.clone()),
            Box::new(MemoryStore::new()),
            Box::new(move || -> jupiter_run::Result<OfflineBackend> {
                Ok(OfflineBackend::new(Box::new(audio_clock.clone())))
            }),
        )
        .with_shop_seed(1);

        game.dispatch(Action::SetNickname("headless".into()));
        game.dispatch(Action::StartGame);

        let mut frame = 0u64;
        while !game.session().status().is_terminal() && frame < 60 * 600 {
            clock.advance(FRAME_MS);
            frame += 1;
            game.dispatch(Action::SetDistance(frame as f32 * 0.5));

            // A gem every second, a letter every two
            if frame % 60 == 0 {
                game.dispatch(Action::CollectGem(100));
                game.play_sfx(SoundEffect::GemCollect);
            }
            if frame % 120 == 0 {
                let next = (0..COLLECTION_TARGET.len())
                    .find(|i| !game.session().has_letter(*i))
                    .unwrap_or(0);
                game.dispatch(Action::CollectLetter(next));
                game.play_sfx(SoundEffect::LetterCollect);
            }

            // Visit the shop between levels
            if game.take_events().iter().any(|e| matches!(e, jupiter_run::SessionEvent::LevelUp(_))) {
                game.dispatch(Action::OpenShop);
                for offer in game.shop_offers() {
                    if game.dispatch(Action::BuyItem {
                        kind: offer.item.kind,
                        cost: offer.cost,
                    }) {
                        log::info!("Headless run bought {}", offer.item.name);
                    }
                }
                game.dispatch(Action::CloseShop);
            }

            game.pump();
        }

        let session = game.session();
        if session.status() == GameStatus::Victory {
            log::info!("Reached Jupiter after {:.1}s", clock_seconds(frame));
        }

        let notes = game
            .audio()
            .backend()
            .map(|b| b.played().len())
            .unwrap_or(0);
        log::info!("Scheduled {} voices", notes);

        match serde_json::to_string_pretty(&session.snapshot()) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to serialize session: {}", e),
        }
    }

    fn clock_seconds(frames: u64) -> f64 {
        frames as f64 * FRAME_MS / 1000.0
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `web::wasm_start`, this is just to satisfy the compiler
}
