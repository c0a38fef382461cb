//! Voice descriptions
//!
//! A voice is one enveloped oscillator or noise burst. The same description
//! drives the Web Audio graph and the offline mixer, so both sound alike.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
    /// White noise (frequency is ignored)
    Noise,
}

impl Waveform {
    /// Sample a periodic waveform at `phase` in [0, 1)
    pub fn sample(&self, phase: f32) -> f32 {
        use std::f32::consts::TAU;
        match self {
            Waveform::Sine => (phase * TAU).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * phase - 1.0,
            Waveform::Triangle => 4.0 * (phase - 0.5).abs() - 1.0,
            Waveform::Noise => 0.0,
        }
    }
}

/// Oscillator frequency over the life of a voice
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pitch {
    Fixed(f32),
    /// Exponential glide from `from` to `to` over `duration` seconds, then hold
    Sweep { from: f32, to: f32, duration: f64 },
}

/// Exponential decay from `peak` to `floor` over `decay` seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub peak: f32,
    pub floor: f32,
    pub decay: f64,
}

impl Envelope {
    pub const fn pluck(peak: f32, floor: f32, decay: f64) -> Self {
        Self { peak, floor, decay }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub waveform: Waveform,
    pub pitch: Pitch,
    pub envelope: Envelope,
    /// Audio-clock time the voice starts sounding
    pub start: f64,
    /// Audio-clock time the voice is cut
    pub stop: f64,
    /// Noise generator seed
    pub seed: u64,
}

impl Voice {
    pub fn tone(waveform: Waveform, pitch: Pitch, envelope: Envelope, start: f64, length: f64) -> Self {
        Self {
            waveform,
            pitch,
            envelope,
            start,
            stop: start + length,
            seed: 0,
        }
    }

    pub fn noise(envelope: Envelope, start: f64, length: f64, seed: u64) -> Self {
        Self {
            waveform: Waveform::Noise,
            pitch: Pitch::Fixed(0.0),
            envelope,
            start,
            stop: start + length,
            seed,
        }
    }

    pub fn duration(&self) -> f64 {
        self.stop - self.start
    }

    /// Amplitude at audio time `t` (zero outside [start, stop))
    pub fn gain_at(&self, t: f64) -> f32 {
        if t < self.start || t >= self.stop {
            return 0.0;
        }
        let Envelope { peak, floor, decay } = self.envelope;
        let elapsed = t - self.start;
        if decay <= 0.0 || elapsed >= decay || peak <= 0.0 {
            return floor;
        }
        let progress = (elapsed / decay) as f32;
        peak * (floor / peak).powf(progress)
    }

    /// Oscillator frequency at audio time `t`
    pub fn frequency_at(&self, t: f64) -> f32 {
        match self.pitch {
            Pitch::Fixed(freq) => freq,
            Pitch::Sweep { from, to, duration } => {
                if duration <= 0.0 || from <= 0.0 {
                    return to;
                }
                let progress = ((t - self.start) / duration).clamp(0.0, 1.0) as f32;
                from * (to / from).powf(progress)
            }
        }
    }

    /// Mix this voice into `out`, whose first sample sits at audio time `out_start`
    pub fn render_into(&self, out: &mut [f32], out_start: f64, sample_rate: f32, gain: f32) {
        let sr = sample_rate as f64;
        let first = ((self.start - out_start) * sr).ceil().max(0.0) as usize;
        let last = (((self.stop - out_start) * sr).ceil().max(0.0) as usize).min(out.len());
        if first >= last {
            return;
        }

        let mut rng = Pcg32::seed_from_u64(self.seed);
        // Phase is continuous from the voice start, even when the buffer begins later
        let mut phase = 0.0f64;
        let voice_first = ((self.start * sr).ceil()) as i64;
        let buffer_first = (out_start * sr).ceil() as i64 + first as i64;
        for skipped in voice_first..buffer_first {
            let t = skipped as f64 / sr;
            phase = (phase + self.frequency_at(t) as f64 / sr).fract();
        }

        for (i, sample) in out.iter_mut().enumerate().take(last).skip(first) {
            let t = out_start + i as f64 / sr;
            let raw = match self.waveform {
                Waveform::Noise => rng.random_range(-1.0f32..1.0),
                w => w.sample(phase as f32),
            };
            *sample += raw * self.gain_at(t) * gain;
            phase = (phase + self.frequency_at(t) as f64 / sr).fract();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pluck() -> Voice {
        Voice::tone(
            Waveform::Sawtooth,
            Pitch::Fixed(110.0),
            Envelope::pluck(0.3, 0.01, 0.15),
            1.0,
            0.2,
        )
    }

    #[test]
    fn test_envelope_decays_exponentially() {
        let v = pluck();
        assert_eq!(v.gain_at(0.99), 0.0);
        assert!((v.gain_at(1.0) - 0.3).abs() < 1e-6);
        let mid = v.gain_at(1.075);
        assert!((mid - (0.3f32 * 0.01).sqrt()).abs() < 1e-4);
        assert!((v.gain_at(1.16) - 0.01).abs() < 1e-6);
        assert_eq!(v.gain_at(1.2), 0.0);
    }

    #[test]
    fn test_envelope_is_monotonic() {
        let v = pluck();
        let mut last = f32::MAX;
        for i in 0..150 {
            let g = v.gain_at(1.0 + i as f64 * 0.001);
            assert!(g <= last);
            last = g;
        }
    }

    #[test]
    fn test_sweep_glides_then_holds() {
        let v = Voice::tone(
            Waveform::Sine,
            Pitch::Sweep {
                from: 200.0,
                to: 450.0,
                duration: 0.15,
            },
            Envelope::pluck(0.2, 0.01, 0.15),
            0.0,
            0.15,
        );
        assert!((v.frequency_at(0.0) - 200.0).abs() < 1e-3);
        assert!((v.frequency_at(0.15) - 450.0).abs() < 1e-2);
        assert!((v.frequency_at(1.0) - 450.0).abs() < 1e-2);
        assert!(v.frequency_at(0.05) > 200.0 && v.frequency_at(0.05) < 450.0);
    }

    #[test]
    fn test_waveform_ranges() {
        for w in [Waveform::Sine, Waveform::Square, Waveform::Sawtooth, Waveform::Triangle] {
            for i in 0..100 {
                let s = w.sample(i as f32 / 100.0);
                assert!((-1.0..=1.0).contains(&s), "{:?} out of range", w);
            }
        }
    }

    #[test]
    fn test_render_only_inside_voice_window() {
        let v = pluck();
        let mut out = vec![0.0f32; 2000];
        v.render_into(&mut out, 0.9, 1000.0, 1.0);
        // Silence before start (index 100 = t 1.0) and after stop (index 300 = t 1.2)
        assert!(out[..100].iter().all(|s| *s == 0.0));
        assert!(out[300..].iter().all(|s| *s == 0.0));
        assert!(out[100..300].iter().any(|s| *s != 0.0));
    }

    #[test]
    fn test_noise_is_seeded() {
        let env = Envelope::pluck(0.5, 0.01, 0.2);
        let mut a = vec![0.0f32; 300];
        let mut b = vec![0.0f32; 300];
        Voice::noise(env, 0.0, 0.3, 9).render_into(&mut a, 0.0, 1000.0, 1.0);
        Voice::noise(env, 0.0, 0.3, 9).render_into(&mut b, 0.0, 1000.0, 1.0);
        assert_eq!(a, b);
        assert!(a.iter().any(|s| *s != 0.0));
    }
}
