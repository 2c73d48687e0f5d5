use std::f64::consts::TAU;

use super::waveform::Waveform;
use super::BlockSource;

/// Test-tone source producing the same signal on both channels
pub struct ToneSource {
    pub waveform: Waveform,
    pub frequency_hz: f32,
    /// Peak level relative to 16-bit full scale (0.0 to 1.0)
    pub amplitude: f32,
    phase: f64,
    sample_rate: f64,
}

impl ToneSource {
    pub fn new(sample_rate: u32, frequency_hz: f32, waveform: Waveform) -> Self {
        Self {
            waveform,
            frequency_hz,
            amplitude: 0.5,
            phase: 0.0,
            sample_rate: sample_rate as f64,
        }
    }

    pub fn with_amplitude(mut self, amplitude: f32) -> Self {
        self.amplitude = amplitude.clamp(0.0, 1.0);
        self
    }

    fn next_sample(&mut self) -> i16 {
        let value = self.waveform.sample(self.phase) * self.amplitude as f64 * 32767.0;
        self.phase += TAU * self.frequency_hz as f64 / self.sample_rate;
        if self.phase >= TAU {
            self.phase -= TAU;
        }
        value.round() as i16
    }
}

impl BlockSource for ToneSource {
    fn fill(&mut self, block: &mut [i16]) {
        for frame in block.chunks_mut(2) {
            let sample = self.next_sample();
            frame.fill(sample);
        }
    }
}
