//! Delay-based stereo widening
//!
//! A 5 ms copy of the dry downmix is added to the left channel and subtracted
//! from the right, decorrelating the two sides.

use super::delay::{DelayLength, DelayLine};
use super::{sanitize, Effect, StereoSample};

/// Widening delay: 5 ms
pub const STEREO_DELAY: DelayLength = DelayLength::SecondDivisor(200);

/// Gain of the delayed sample; positive on the left, negated on the right
pub const STEREO_GAIN: f32 = 0.5;

pub struct StereoWidener {
    line: DelayLine<f32>,
}

impl StereoWidener {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            line: DelayLine::with_length(sample_rate, STEREO_DELAY),
        }
    }

    pub fn delay_line(&self) -> &DelayLine<f32> {
        &self.line
    }
}

impl Effect for StereoWidener {
    fn name(&self) -> &'static str {
        "stereo"
    }

    fn process(&mut self, dry: StereoSample, wet: &mut StereoSample) {
        let delayed = self.line.read_at_offset(self.line.len());
        wet.left += delayed * STEREO_GAIN;
        wet.right -= delayed * STEREO_GAIN;
        self.line.write_and_advance(sanitize(dry.mono()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delayed_signal_is_anti_phase() {
        let mut widener = StereoWidener::new(44100);
        let len = widener.delay_line().len();
        assert_eq!(len, 220);

        let constant = StereoSample::new(1000.0, 1000.0);
        let mut wet = constant;
        for _ in 0..len {
            wet = constant;
            widener.process(constant, &mut wet);
        }
        // Nothing has come out of the line yet
        assert_eq!(wet, constant);

        wet = constant;
        widener.process(constant, &mut wet);
        assert_eq!(wet.left, 1500.0);
        assert_eq!(wet.right, 500.0);
    }
}
