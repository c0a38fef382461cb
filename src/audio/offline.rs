//! Offline backend: records voices and mixes them into PCM on demand
//!
//! Used by native builds (no audio device is opened) and by tests. Its audio
//! clock follows a wall [`Clock`], so driving a `ManualClock` drives both.

use super::voice::Voice;
use super::{AudioBackend, Bus, BusLevels};
use crate::platform::Clock;

pub struct OfflineBackend {
    clock: Box<dyn Clock>,
    levels: BusLevels,
    suspended: bool,
    played: Vec<(Bus, Voice)>,
}

impl OfflineBackend {
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self {
            clock,
            levels: BusLevels::default(),
            suspended: false,
            played: Vec::new(),
        }
    }

    /// Start suspended, like a browser context created before a user gesture
    pub fn suspended(mut self) -> Self {
        self.suspended = true;
        self
    }

    pub fn with_levels(mut self, levels: BusLevels) -> Self {
        self.levels = levels;
        self
    }

    pub fn levels(&self) -> BusLevels {
        self.levels
    }

    /// Every voice scheduled so far, in scheduling order
    pub fn played(&self) -> &[(Bus, Voice)] {
        &self.played
    }

    pub fn take_played(&mut self) -> Vec<(Bus, Voice)> {
        std::mem::take(&mut self.played)
    }

    /// Mix recorded voices into a mono buffer covering `[start, start + duration)`
    pub fn render(&self, start: f64, duration: f64, sample_rate: f32) -> Vec<f32> {
        let len = (duration.max(0.0) * sample_rate as f64).round() as usize;
        let mut out = vec![0.0f32; len];
        for (bus, voice) in &self.played {
            voice.render_into(&mut out, start, sample_rate, self.levels.gain(*bus));
        }
        out
    }
}

impl AudioBackend for OfflineBackend {
    fn current_time(&self) -> f64 {
        self.clock.now_ms() / 1000.0
    }

    fn is_suspended(&self) -> bool {
        self.suspended
    }

    fn resume(&mut self) -> crate::Result<()> {
        self.suspended = false;
        Ok(())
    }

    fn play(&mut self, bus: Bus, voice: &Voice) -> crate::Result<()> {
        if self.suspended {
            return Err(crate::Error::audio("context suspended"));
        }
        self.played.push((bus, *voice));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SoundEffect;
    use crate::platform::ManualClock;

    #[test]
    fn test_audio_clock_follows_wall_clock() {
        let clock = ManualClock::new(1500.0);
        let backend = OfflineBackend::new(Box::new(clock.clone()));
        assert_eq!(backend.current_time(), 1.5);
        clock.advance(250.0);
        assert_eq!(backend.current_time(), 1.75);
    }

    #[test]
    fn test_suspended_backend_rejects_voices() {
        let mut backend = OfflineBackend::new(Box::new(ManualClock::new(0.0))).suspended();
        let voice = SoundEffect::Jump.voices(0.0, 0)[0];
        assert!(backend.play(Bus::Sfx, &voice).is_err());
        backend.resume().unwrap();
        assert!(backend.play(Bus::Sfx, &voice).is_ok());
        assert_eq!(backend.played().len(), 1);
    }

    #[test]
    fn test_render_applies_bus_gain() {
        let mut backend = OfflineBackend::new(Box::new(ManualClock::new(0.0)));
        let voice = SoundEffect::Jump.voices(0.0, 0)[0];
        backend.play(Bus::Sfx, &voice).unwrap();
        let pcm = backend.render(0.0, 0.2, 8000.0);
        assert_eq!(pcm.len(), 1600);

        // Peak envelope 0.2 through the 0.4 sfx bus
        let peak = pcm.iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(peak > 0.0 && peak <= 0.2 * 0.4 + 1e-6);
        // Silent after the voice stops at 0.15s
        assert!(pcm[1201..].iter().all(|s| *s == 0.0));
    }
}
