//! Look-ahead music sequencer
//!
//! The wall-clock poll (every [`POLL_INTERVAL_MS`]) is imprecise, so notes are
//! never played "now". Each poll schedules every step whose start falls inside
//! the next [`LOOKAHEAD_SECS`] of the audio clock, stamped with its exact
//! audio-clock time. Polling jitter smaller than the look-ahead window never
//! produces gaps or drift.

use super::voice::{Envelope, Pitch, Voice, Waveform};
use crate::consts::MUSIC_TEMPO_BPM;

/// Audio-clock window scheduled ahead on each poll
pub const LOOKAHEAD_SECS: f64 = 0.1;
/// Wall-clock interval between scheduler polls
pub const POLL_INTERVAL_MS: f64 = 25.0;
/// Sixteenth-note steps per bar
pub const STEPS_PER_BAR: u8 = 16;

/// Bass roots (C2, Eb2, Bb1)
const BASS_C2: f32 = 65.41;
const BASS_EB2: f32 = 77.78;
const BASS_BB1: f32 = 58.27;

/// One sixteenth-note step of the bar, pinned to the audio clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteStep {
    pub index: u8,
    pub time: f64,
}

impl NoteStep {
    /// Bass pitch: C for the first half bar, Eb, then Bb; odd steps an octave up
    pub fn bass_frequency(&self) -> f32 {
        let root = match self.index {
            0..=7 => BASS_C2,
            8..=11 => BASS_EB2,
            _ => BASS_BB1,
        };
        if self.index % 2 == 1 { root * 2.0 } else { root }
    }

    /// Every fourth step layers a high square arpeggio
    pub fn has_arp(&self) -> bool {
        self.index % 4 == 0
    }

    pub fn voices(&self) -> Vec<Voice> {
        let freq = self.bass_frequency();
        let mut voices = Vec::with_capacity(2);

        // Short sawtooth pluck
        voices.push(Voice::tone(
            Waveform::Sawtooth,
            Pitch::Fixed(freq),
            Envelope::pluck(0.3, 0.01, 0.15),
            self.time,
            0.2,
        ));

        if self.has_arp() {
            voices.push(Voice::tone(
                Waveform::Square,
                Pitch::Fixed(freq * 4.0),
                Envelope::pluck(0.05, 0.001, 0.1),
                self.time,
                0.1,
            ));
        }

        voices
    }
}

#[derive(Debug, Clone)]
pub struct Sequencer {
    tempo_bpm: f64,
    next_note_time: f64,
    note_index: u8,
    playing: bool,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new(MUSIC_TEMPO_BPM)
    }
}

impl Sequencer {
    pub fn new(tempo_bpm: f64) -> Self {
        Self {
            tempo_bpm: tempo_bpm.max(1.0),
            next_note_time: 0.0,
            note_index: 0,
            playing: false,
        }
    }

    pub fn tempo_bpm(&self) -> f64 {
        self.tempo_bpm
    }

    /// Length of one sixteenth note, in seconds
    pub fn step_duration(&self) -> f64 {
        0.25 * (60.0 / self.tempo_bpm)
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn next_note_time(&self) -> f64 {
        self.next_note_time
    }

    pub fn note_index(&self) -> u8 {
        self.note_index
    }

    /// Restart the bar at the given audio time
    pub fn start(&mut self, audio_now: f64) {
        self.playing = true;
        self.note_index = 0;
        self.next_note_time = audio_now;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    /// Emit every step due within the look-ahead window. Returns the count.
    pub fn schedule(&mut self, audio_now: f64, mut emit: impl FnMut(NoteStep)) -> usize {
        if !self.playing {
            return 0;
        }

        let mut emitted = 0;
        while self.next_note_time < audio_now + LOOKAHEAD_SECS {
            emit(NoteStep {
                index: self.note_index,
                time: self.next_note_time,
            });
            self.advance();
            emitted += 1;
        }
        emitted
    }

    fn advance(&mut self) {
        self.next_note_time += self.step_duration();
        self.note_index = (self.note_index + 1) % STEPS_PER_BAR;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_duration_at_110_bpm() {
        let seq = Sequencer::default();
        assert!((seq.step_duration() - 60.0 / 110.0 / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_idle_sequencer_emits_nothing() {
        let mut seq = Sequencer::default();
        assert_eq!(seq.schedule(10.0, |_| panic!("not playing")), 0);
    }

    #[test]
    fn test_start_schedules_first_step_immediately() {
        let mut seq = Sequencer::default();
        seq.start(3.0);
        let mut steps = Vec::new();
        seq.schedule(3.0, |s| steps.push(s));
        assert_eq!(steps, vec![NoteStep { index: 0, time: 3.0 }]);
        assert_eq!(seq.note_index(), 1);
    }

    #[test]
    fn test_one_note_per_step_spaced_poll() {
        let mut seq = Sequencer::default();
        let step = seq.step_duration();
        let start = 12.5;
        seq.start(start);

        let mut steps = Vec::new();
        let polls = 40;
        for k in 0..polls {
            let n = seq.schedule(start + k as f64 * step, |s| steps.push(s));
            assert_eq!(n, 1);
        }

        assert_eq!(steps.len(), polls);
        for pair in steps.windows(2) {
            assert!((pair[1].time - pair[0].time - step).abs() < 1e-9);
            assert_eq!(pair[1].index, (pair[0].index + 1) % STEPS_PER_BAR);
        }
    }

    #[test]
    fn test_late_poll_catches_up_without_drift() {
        let mut seq = Sequencer::default();
        let step = seq.step_duration();
        seq.start(0.0);
        let mut times = Vec::new();
        // A 1s stall: everything overdue is scheduled in one go, still on the grid
        seq.schedule(1.0, |s| times.push(s.time));
        let expected = ((1.0 + LOOKAHEAD_SECS) / step).ceil() as usize;
        assert_eq!(times.len(), expected);
        for (i, t) in times.iter().enumerate() {
            assert!((t - i as f64 * step).abs() < 1e-9);
        }
    }

    #[test]
    fn test_stop_halts_scheduling() {
        let mut seq = Sequencer::default();
        seq.start(0.0);
        seq.stop();
        assert_eq!(seq.schedule(5.0, |_| {}), 0);
    }

    #[test]
    fn test_bass_pattern() {
        let f = |index| NoteStep { index, time: 0.0 }.bass_frequency();
        assert_eq!(f(0), BASS_C2);
        assert_eq!(f(1), BASS_C2 * 2.0);
        assert_eq!(f(8), BASS_EB2);
        assert_eq!(f(11), BASS_EB2 * 2.0);
        assert_eq!(f(12), BASS_BB1);
        assert_eq!(f(15), BASS_BB1 * 2.0);
    }

    #[test]
    fn test_arp_every_fourth_step() {
        for index in 0..STEPS_PER_BAR {
            let voices = NoteStep { index, time: 1.0 }.voices();
            let expected = if index % 4 == 0 { 2 } else { 1 };
            assert_eq!(voices.len(), expected);
            assert_eq!(voices[0].waveform, Waveform::Sawtooth);
            if expected == 2 {
                assert_eq!(voices[1].waveform, Waveform::Square);
                assert_eq!(voices[1].pitch, Pitch::Fixed(voices[0].frequency_at(1.0) * 4.0));
            }
        }
    }
}
