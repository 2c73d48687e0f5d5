use super::{Effect, StereoSample};
use crate::engine::lfo::Lfo;

/// Modulation rate, fixed like the vibrato's
pub const TREMOLO_RATE_HZ: f32 = 3.0;

/// Centre gain
pub const TREMOLO_CENTER: f32 = 0.85;

/// Peak deviation around the centre gain
pub const TREMOLO_DEPTH: f32 = 0.075;

/// Amplitude modulation between 0.775 and 0.925
pub struct Tremolo {
    lfo: Lfo,
}

impl Tremolo {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            lfo: Lfo::new(0.0, sample_rate),
        }
    }

    pub fn phase(&self) -> f64 {
        self.lfo.phase()
    }
}

impl Effect for Tremolo {
    fn name(&self) -> &'static str {
        "tremolo"
    }

    fn process(&mut self, _dry: StereoSample, wet: &mut StereoSample) {
        wet.scale(TREMOLO_CENTER + TREMOLO_DEPTH * self.lfo.sin());
        self.lfo.advance(TREMOLO_RATE_HZ);
    }
}
