//! One-shot sound effects
//!
//! Procedurally generated, triggered immediately (no look-ahead).

use super::voice::{Envelope, Pitch, Voice, Waveform};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Gem picked up
    GemCollect,
    /// Letter of the collection target picked up
    LetterCollect,
    /// Jump off the ground
    Jump,
    /// Second jump in mid-air
    DoubleJump,
    /// Obstacle hit
    Damage,
}

impl SoundEffect {
    /// Voices for this effect starting at audio time `t`
    pub fn voices(self, t: f64, noise_seed: u64) -> Vec<Voice> {
        match self {
            SoundEffect::GemCollect => gem_collect(t),
            SoundEffect::LetterCollect => letter_collect(t),
            SoundEffect::Jump => jump(t, 200.0, 450.0),
            SoundEffect::DoubleJump => jump(t, 400.0, 800.0),
            SoundEffect::Damage => damage(t, noise_seed),
        }
    }
}

/// Gem - bright upward chirp
fn gem_collect(t: f64) -> Vec<Voice> {
    vec![Voice::tone(
        Waveform::Sine,
        Pitch::Sweep {
            from: 1200.0,
            to: 2000.0,
            duration: 0.1,
        },
        Envelope::pluck(0.5, 0.01, 0.15),
        t,
        0.15,
    )]
}

/// Letter - staggered major triad (C5, E5, G5)
fn letter_collect(t: f64) -> Vec<Voice> {
    [523.25, 659.25, 783.99]
        .iter()
        .enumerate()
        .map(|(i, freq)| {
            let start = t + i as f64 * 0.04;
            Voice::tone(
                Waveform::Triangle,
                Pitch::Fixed(*freq),
                Envelope::pluck(0.3, 0.01, 0.3),
                start,
                0.3,
            )
        })
        .collect()
}

/// Jump - whoosh up
fn jump(t: f64, from: f32, to: f32) -> Vec<Voice> {
    vec![Voice::tone(
        Waveform::Sine,
        Pitch::Sweep {
            from,
            to,
            duration: 0.15,
        },
        Envelope::pluck(0.2, 0.01, 0.15),
        t,
        0.15,
    )]
}

/// Damage - falling growl plus a noise crunch
fn damage(t: f64, noise_seed: u64) -> Vec<Voice> {
    vec![
        Voice::tone(
            Waveform::Sawtooth,
            Pitch::Sweep {
                from: 100.0,
                to: 20.0,
                duration: 0.3,
            },
            Envelope::pluck(0.6, 0.01, 0.3),
            t,
            0.3,
        ),
        Voice::noise(Envelope::pluck(0.5, 0.01, 0.2), t, 0.3, noise_seed),
    ]
}
