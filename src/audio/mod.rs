//! Audio: look-ahead music sequencer and procedural sound effects
//!
//! Everything is synthesized from oscillators and noise, no sample assets.
//! Sounds are described as [`Voice`] values and handed to an
//! [`AudioBackend`]: Web Audio in the browser, an offline recorder/mixer
//! natively and in tests.
//!
//! Audio is never gameplay-critical. Backend failures are logged and
//! swallowed; nothing here reports errors to the session.

pub mod engine;
pub mod offline;
pub mod sequencer;
pub mod sfx;
pub mod voice;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use engine::{AudioEngine, BackendOpener};
pub use offline::OfflineBackend;
pub use sequencer::{LOOKAHEAD_SECS, NoteStep, POLL_INTERVAL_MS, STEPS_PER_BAR, Sequencer};
pub use sfx::SoundEffect;
pub use voice::{Envelope, Pitch, Voice, Waveform};

#[cfg(target_arch = "wasm32")]
pub use web::WebAudioBackend;

/// Mixer bus a voice is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bus {
    Music,
    Sfx,
}

/// Gains of the output graph: music and sfx buses feed the master bus
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BusLevels {
    pub master: f32,
    pub music: f32,
    pub sfx: f32,
}

impl Default for BusLevels {
    fn default() -> Self {
        Self {
            master: 1.0,
            music: 0.3,
            sfx: 0.4,
        }
    }
}

impl BusLevels {
    /// Effective gain from a bus input to the output
    pub fn gain(&self, bus: Bus) -> f32 {
        let bus_gain = match bus {
            Bus::Music => self.music,
            Bus::Sfx => self.sfx,
        };
        self.master * bus_gain
    }
}

/// An audio output with its own sample-accurate clock
pub trait AudioBackend {
    /// Audio clock, in seconds
    fn current_time(&self) -> f64;

    /// Platforms may start the output suspended until a user gesture
    fn is_suspended(&self) -> bool {
        false
    }

    fn resume(&mut self) -> crate::Result<()> {
        Ok(())
    }

    /// Schedule a voice on a bus at the voice's own start time
    fn play(&mut self, bus: Bus, voice: &Voice) -> crate::Result<()>;
}
