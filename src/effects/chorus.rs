//! Three-voice chorus
//!
//! Each voice owns a short delay line and an amplitude LFO. All three LFOs run
//! at the same speed and differ only in their starting phase.
//!
//! The voices read one full buffer-length behind the cursor, so the effective
//! delays are the line lengths themselves (10, 15 and 20 ms) rather than a
//! shorter modulated offset.

use super::delay::{DelayLength, DelayLine};
use super::{sanitize, Effect, StereoSample};
use crate::engine::lfo::Lfo;

/// Voice lengths: 10 ms, 15 ms (fixed frame count), 20 ms
pub const CHORUS_VOICES: [DelayLength; 3] = [
    DelayLength::SecondDivisor(100),
    DelayLength::Frames(661),
    DelayLength::SecondDivisor(50),
];

/// Starting phase of each voice LFO, in radians
pub const CHORUS_INITIAL_PHASES: [f64; 3] = [0.5, 0.5, 0.0];

const VOICE_WEIGHTS: [f32; 3] = [0.4, 0.4, 0.3];

/// Portion of the voice sum mixed into the output
pub const CHORUS_MIX: f32 = 0.15;

pub struct Chorus {
    lines: [DelayLine<f32>; 3],
    lfos: [Lfo; 3],
    depth: f32,
    speed_hz: f32,
}

impl Chorus {
    pub fn new(sample_rate: u32, depth: f32, speed_hz: f32) -> Self {
        Self {
            lines: CHORUS_VOICES.map(|voice| DelayLine::with_length(sample_rate, voice)),
            lfos: CHORUS_INITIAL_PHASES.map(|phase| Lfo::new(phase, sample_rate)),
            depth,
            speed_hz,
        }
    }

    pub fn set_depth(&mut self, depth: f32) {
        self.depth = depth;
    }

    pub fn set_speed(&mut self, speed_hz: f32) {
        self.speed_hz = speed_hz;
    }

    pub fn delay_lines(&self) -> &[DelayLine<f32>; 3] {
        &self.lines
    }

    /// Current voice phases in radians
    pub fn phases(&self) -> [f64; 3] {
        [self.lfos[0].phase(), self.lfos[1].phase(), self.lfos[2].phase()]
    }
}

impl Effect for Chorus {
    fn name(&self) -> &'static str {
        "chorus"
    }

    fn process(&mut self, dry: StereoSample, wet: &mut StereoSample) {
        let mut voices = 0.0;
        for ((line, lfo), weight) in self.lines.iter().zip(&self.lfos).zip(VOICE_WEIGHTS) {
            // len % len: the read lands on the cursor, a full buffer-length back
            let offset = line.len() % line.len();
            let modulation = 0.5 + self.depth * lfo.sin();
            voices += line.read_at_offset(offset) * modulation * weight;
        }
        wet.add_mono(voices * CHORUS_MIX);

        let input = sanitize(dry.mono());
        for line in self.lines.iter_mut() {
            line.write_and_advance(input);
        }
        for lfo in self.lfos.iter_mut() {
            lfo.advance(self.speed_hz);
        }
    }
}
