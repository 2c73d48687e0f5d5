//! Single-tap echo
//!
//! A quarter-second mono tail: the line is read one full buffer-length behind
//! the cursor and the dry downmix is written back without feedback, so each
//! input frame is heard exactly once more.

use super::delay::{DelayLength, DelayLine};
use super::{sanitize, Effect, StereoSample};

/// Echo delay: a quarter of a second
pub const ECHO_DELAY: DelayLength = DelayLength::SecondDivisor(4);

/// Gain applied to the delayed sample
pub const ECHO_GAIN: f32 = 0.3;

pub struct Echo {
    line: DelayLine<f32>,
}

impl Echo {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            line: DelayLine::with_length(sample_rate, ECHO_DELAY),
        }
    }

    pub fn delay_line(&self) -> &DelayLine<f32> {
        &self.line
    }
}

impl Effect for Echo {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn process(&mut self, dry: StereoSample, wet: &mut StereoSample) {
        let delayed = self.line.read_at_offset(self.line.len());
        wet.add_mono(delayed * ECHO_GAIN);
        self.line.write_and_advance(sanitize(dry.mono()));
    }
}
