//! Web Audio API backend
//!
//! Graph: voice -> per-voice gain -> music/sfx bus -> master -> destination.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use web_sys::{AudioContext, AudioContextState, AudioParam, GainNode, OscillatorType};

use super::voice::{Pitch, Voice, Waveform};
use super::{AudioBackend, Bus, BusLevels};
use crate::error::{Error, Result};

fn js_err(value: wasm_bindgen::JsValue) -> Error {
    Error::audio(Error::js_message(&value))
}

pub struct WebAudioBackend {
    ctx: AudioContext,
    /// Held so the bus graph stays connected to the destination
    _master: GainNode,
    music: GainNode,
    sfx: GainNode,
}

impl WebAudioBackend {
    /// Create the context and bus graph. Browsers may refuse before a user gesture.
    pub fn open(levels: BusLevels) -> Result<Self> {
        let ctx = AudioContext::new()
            .map_err(|e| Error::AudioUnavailable(Error::js_message(&e)))?;

        let master = ctx.create_gain().map_err(js_err)?;
        master.gain().set_value(levels.master);
        master
            .connect_with_audio_node(&ctx.destination())
            .map_err(js_err)?;

        let music = ctx.create_gain().map_err(js_err)?;
        music.gain().set_value(levels.music);
        music.connect_with_audio_node(&master).map_err(js_err)?;

        let sfx = ctx.create_gain().map_err(js_err)?;
        sfx.gain().set_value(levels.sfx);
        sfx.connect_with_audio_node(&master).map_err(js_err)?;

        Ok(Self {
            ctx,
            _master: master,
            music,
            sfx,
        })
    }

    fn bus(&self, bus: Bus) -> &GainNode {
        match bus {
            Bus::Music => &self.music,
            Bus::Sfx => &self.sfx,
        }
    }

    /// Per-voice gain with the exponential pluck envelope, routed into a bus
    fn envelope_gain(&self, bus: Bus, voice: &Voice) -> Result<GainNode> {
        let gain = self.ctx.create_gain().map_err(js_err)?;
        let env = voice.envelope;
        let param = gain.gain();
        param
            .set_value_at_time(env.peak, voice.start)
            .map_err(js_err)?;
        param
            .exponential_ramp_to_value_at_time(env.floor, voice.start + env.decay)
            .map_err(js_err)?;
        gain.connect_with_audio_node(self.bus(bus)).map_err(js_err)?;
        Ok(gain)
    }

    fn apply_pitch(param: &AudioParam, voice: &Voice) -> Result<()> {
        match voice.pitch {
            Pitch::Fixed(freq) => {
                param.set_value_at_time(freq, voice.start).map_err(js_err)?;
            }
            Pitch::Sweep { from, to, duration } => {
                param.set_value_at_time(from, voice.start).map_err(js_err)?;
                param
                    .exponential_ramp_to_value_at_time(to, voice.start + duration)
                    .map_err(js_err)?;
            }
        }
        Ok(())
    }

    fn play_oscillator(&self, bus: Bus, voice: &Voice, osc_type: OscillatorType) -> Result<()> {
        let osc = self.ctx.create_oscillator().map_err(js_err)?;
        osc.set_type(osc_type);
        Self::apply_pitch(&osc.frequency(), voice)?;

        let gain = self.envelope_gain(bus, voice)?;
        osc.connect_with_audio_node(&gain).map_err(js_err)?;

        osc.start_with_when(voice.start).map_err(js_err)?;
        osc.stop_with_when(voice.stop).map_err(js_err)?;
        Ok(())
    }

    fn play_noise(&self, bus: Bus, voice: &Voice) -> Result<()> {
        let sample_rate = self.ctx.sample_rate();
        let len = ((voice.duration() * sample_rate as f64).ceil() as u32).max(1);
        let buffer = self
            .ctx
            .create_buffer(1, len, sample_rate)
            .map_err(js_err)?;

        let mut rng = Pcg32::seed_from_u64(voice.seed);
        let mut samples: Vec<f32> = (0..len).map(|_| rng.random_range(-1.0f32..1.0)).collect();
        buffer.copy_to_channel(&mut samples, 0).map_err(js_err)?;

        let source = self.ctx.create_buffer_source().map_err(js_err)?;
        source.set_buffer(Some(&buffer));

        let gain = self.envelope_gain(bus, voice)?;
        source.connect_with_audio_node(&gain).map_err(js_err)?;

        source.start_with_when(voice.start).map_err(js_err)?;
        source.stop_with_when(voice.stop).map_err(js_err)?;
        Ok(())
    }
}

impl AudioBackend for WebAudioBackend {
    fn current_time(&self) -> f64 {
        self.ctx.current_time()
    }

    fn is_suspended(&self) -> bool {
        self.ctx.state() == AudioContextState::Suspended
    }

    fn resume(&mut self) -> Result<()> {
        // The returned promise may reject (autoplay policy); nobody awaits it
        self.ctx.resume().map(|_| ()).map_err(js_err)
    }

    fn play(&mut self, bus: Bus, voice: &Voice) -> Result<()> {
        match voice.waveform {
            Waveform::Sine => self.play_oscillator(bus, voice, OscillatorType::Sine),
            Waveform::Square => self.play_oscillator(bus, voice, OscillatorType::Square),
            Waveform::Sawtooth => self.play_oscillator(bus, voice, OscillatorType::Sawtooth),
            Waveform::Triangle => self.play_oscillator(bus, voice, OscillatorType::Triangle),
            Waveform::Noise => self.play_noise(bus, voice),
        }
    }
}
