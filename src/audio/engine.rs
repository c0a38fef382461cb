//! Audio engine: lazy backend, music scheduler loop, sfx triggers

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::sequencer::{POLL_INTERVAL_MS, Sequencer};
use super::sfx::SoundEffect;
use super::{AudioBackend, Bus};
use crate::platform::TimerSlot;

/// Creates the platform backend. Called lazily and retried until it succeeds.
pub type BackendOpener<B> = Box<dyn FnMut() -> crate::Result<B>>;

/// Audio manager for the game
pub struct AudioEngine<B: AudioBackend> {
    opener: BackendOpener<B>,
    backend: Option<B>,
    sequencer: Sequencer,
    /// Pending scheduler poll (wall clock)
    poll: TimerSlot,
    sfx_enabled: bool,
    noise_rng: Pcg32,
}

impl<B: AudioBackend> AudioEngine<B> {
    pub fn new(opener: BackendOpener<B>) -> Self {
        Self {
            opener,
            backend: None,
            sequencer: Sequencer::default(),
            poll: TimerSlot::new(),
            sfx_enabled: true,
            noise_rng: Pcg32::seed_from_u64(0x5EED),
        }
    }

    pub fn with_tempo(mut self, tempo_bpm: f64) -> Self {
        self.sequencer = Sequencer::new(tempo_bpm);
        self
    }

    /// Open the backend if needed and resume it if suspended. Safe to call
    /// repeatedly; returns whether a backend is available.
    pub fn init(&mut self) -> bool {
        if self.backend.is_none() {
            match (self.opener)() {
                Ok(backend) => {
                    log::info!("Audio initialized");
                    self.backend = Some(backend);
                }
                Err(e) => {
                    log::warn!("Audio unavailable: {}", e);
                    return false;
                }
            }
        }

        if let Some(backend) = self.backend.as_mut() {
            if backend.is_suspended() {
                if let Err(e) = backend.resume() {
                    log::debug!("Audio resume failed: {}", e);
                }
            }
        }
        true
    }

    pub fn is_initialized(&self) -> bool {
        self.backend.is_some()
    }

    pub fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }

    pub fn backend_mut(&mut self) -> Option<&mut B> {
        self.backend.as_mut()
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn is_playing_music(&self) -> bool {
        self.sequencer.is_playing()
    }

    /// Wall-clock time of the next scheduler poll, if the loop is armed
    pub fn next_poll_ms(&self) -> Option<f64> {
        self.poll.deadline_ms()
    }

    pub fn sfx_enabled(&self) -> bool {
        self.sfx_enabled
    }

    pub fn set_sfx_enabled(&mut self, enabled: bool) {
        self.sfx_enabled = enabled;
    }

    /// Start the music loop from the top of the bar. No-op while playing.
    pub fn start_music(&mut self, now_ms: f64) {
        if !self.init() || self.sequencer.is_playing() {
            return;
        }
        let Some(backend) = self.backend.as_ref() else {
            return;
        };
        self.sequencer.start(backend.current_time());
        log::debug!("Music started");
        self.run_scheduler(now_ms);
    }

    /// Stop the loop and drop the pending poll. Notes already handed to the
    /// backend finish on their own.
    pub fn stop_music(&mut self) {
        if self.sequencer.is_playing() {
            log::debug!("Music stopped");
        }
        self.sequencer.stop();
        self.poll.cancel();
    }

    /// Run the scheduler if its poll is due. Call from the host loop.
    pub fn pump(&mut self, now_ms: f64) {
        if self.poll.fire(now_ms) {
            self.run_scheduler(now_ms);
        }
    }

    /// Schedule everything inside the look-ahead window, then re-arm the poll
    fn run_scheduler(&mut self, now_ms: f64) {
        let Self {
            backend,
            sequencer,
            poll,
            ..
        } = self;
        let Some(backend) = backend.as_mut() else {
            return;
        };
        if !sequencer.is_playing() {
            return;
        }

        let audio_now = backend.current_time();
        sequencer.schedule(audio_now, |step| {
            for voice in step.voices() {
                if let Err(e) = backend.play(Bus::Music, &voice) {
                    log::debug!("Dropped music note {}: {}", step.index, e);
                }
            }
        });

        poll.arm(now_ms, POLL_INTERVAL_MS);
    }

    /// Trigger a one-shot effect right now (gated by the sfx preference)
    pub fn play(&mut self, effect: SoundEffect) {
        if !self.sfx_enabled || !self.init() {
            return;
        }
        let seed = self.noise_rng.random::<u64>();
        let Some(backend) = self.backend.as_mut() else {
            return;
        };

        let t = backend.current_time();
        for voice in effect.voices(t, seed) {
            if let Err(e) = backend.play(Bus::Sfx, &voice) {
                log::debug!("Dropped {:?}: {}", effect, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::audio::OfflineBackend;
    use crate::platform::{Clock, ManualClock};

    fn engine(clock: &ManualClock) -> AudioEngine<OfflineBackend> {
        let clock = clock.clone();
        AudioEngine::new(Box::new(move || -> crate::Result<OfflineBackend> {
            Ok(OfflineBackend::new(Box::new(clock.clone())))
        }))
    }

    fn music_notes(engine: &AudioEngine<OfflineBackend>) -> Vec<f64> {
        engine
            .backend()
            .map(|b| {
                b.played()
                    .iter()
                    .filter(|(bus, v)| *bus == Bus::Music && v.envelope.peak == 0.3)
                    .map(|(_, v)| v.start)
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn test_init_is_lazy_and_idempotent() {
        let clock = ManualClock::new(0.0);
        let mut audio = engine(&clock);
        assert!(!audio.is_initialized());
        assert!(audio.init());
        assert!(audio.init());
        assert!(audio.is_initialized());
    }

    #[test]
    fn test_init_resumes_suspended_backend() {
        let clock = ManualClock::new(0.0);
        let c = clock.clone();
        let mut audio = AudioEngine::new(Box::new(move || -> crate::Result<OfflineBackend> {
            Ok(OfflineBackend::new(Box::new(c.clone())).suspended())
        }));
        audio.init();
        assert!(!audio.backend().unwrap().is_suspended());
    }

    #[test]
    fn test_failed_open_is_retried_and_silent() {
        let mut attempts = 0;
        let clock = ManualClock::new(0.0);
        let c = clock.clone();
        let mut audio = AudioEngine::new(Box::new(move || -> crate::Result<OfflineBackend> {
            attempts += 1;
            if attempts == 1 {
                Err(Error::AudioUnavailable("no user gesture".into()))
            } else {
                Ok(OfflineBackend::new(Box::new(c.clone())))
            }
        }));

        audio.start_music(0.0);
        assert!(!audio.is_playing_music());
        audio.play(SoundEffect::Jump);

        audio.start_music(0.0);
        assert!(audio.is_playing_music());
    }

    #[test]
    fn test_music_loop_rearms_every_poll() {
        let clock = ManualClock::new(0.0);
        let mut audio = engine(&clock);
        audio.start_music(clock.now_ms());
        assert_eq!(music_notes(&audio), vec![0.0]);
        assert_eq!(audio.next_poll_ms(), Some(POLL_INTERVAL_MS));

        // Two seconds of 25ms polls
        for _ in 0..80 {
            clock.advance(POLL_INTERVAL_MS);
            audio.pump(clock.now_ms());
        }
        let notes = music_notes(&audio);
        let step = audio.sequencer().step_duration();
        let expected = ((2.0 + crate::audio::LOOKAHEAD_SECS) / step).ceil() as usize;
        assert_eq!(notes.len(), expected);
        for (i, t) in notes.iter().enumerate() {
            assert!((t - i as f64 * step).abs() < 1e-9);
        }
    }

    #[test]
    fn test_start_while_playing_is_noop() {
        let clock = ManualClock::new(0.0);
        let mut audio = engine(&clock);
        audio.start_music(0.0);
        clock.advance(500.0);
        audio.pump(clock.now_ms());
        let index = audio.sequencer().note_index();
        audio.start_music(clock.now_ms());
        assert_eq!(audio.sequencer().note_index(), index);
    }

    #[test]
    fn test_stop_cancels_pending_poll() {
        let clock = ManualClock::new(0.0);
        let mut audio = engine(&clock);
        audio.start_music(0.0);
        audio.stop_music();
        assert_eq!(audio.next_poll_ms(), None);

        let before = music_notes(&audio).len();
        clock.advance(1000.0);
        audio.pump(clock.now_ms());
        assert_eq!(music_notes(&audio).len(), before);
    }

    #[test]
    fn test_sfx_gate() {
        let clock = ManualClock::new(0.0);
        let mut audio = engine(&clock);
        audio.set_sfx_enabled(false);
        audio.play(SoundEffect::GemCollect);
        assert!(!audio.is_initialized());

        audio.set_sfx_enabled(true);
        audio.play(SoundEffect::Damage);
        let played = audio.backend().unwrap().played();
        assert_eq!(played.len(), 2);
        assert!(played.iter().all(|(bus, _)| *bus == Bus::Sfx));
    }
}
