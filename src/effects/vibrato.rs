use super::{Effect, StereoSample};
use crate::engine::lfo::Lfo;

/// Modulation rate; fixed, the chorus speed parameter does not apply here
pub const VIBRATO_RATE_HZ: f32 = 3.0;

/// Peak gain deviation
pub const VIBRATO_DEPTH: f32 = 0.03;

/// Gain wobble of ±3% at 3 Hz; no delay line involved
pub struct Vibrato {
    lfo: Lfo,
}

impl Vibrato {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            lfo: Lfo::new(0.0, sample_rate),
        }
    }

    pub fn phase(&self) -> f64 {
        self.lfo.phase()
    }
}

impl Effect for Vibrato {
    fn name(&self) -> &'static str {
        "vibrato"
    }

    fn process(&mut self, _dry: StereoSample, wet: &mut StereoSample) {
        wet.scale(1.0 + VIBRATO_DEPTH * self.lfo.sin());
        self.lfo.advance(VIBRATO_RATE_HZ);
    }
}
