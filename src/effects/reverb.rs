//! Five-tap feedback reverb
//!
//! Five parallel delay lines of different lengths are read one buffer-length
//! behind their cursors and summed with fixed gains. The last two taps are
//! weighted by `1 - damping`, which stands in for high-frequency roll-off
//! without any actual filtering.
//!
//! Every line is fed the same value: the dry downmix plus the tap sum scaled by
//! the feedback coefficient, saturated to the 16-bit range. The sum is computed
//! once per frame and reused for the write-back. Saturating the stored value
//! keeps the loop bounded when feedback pushes the loop gain above one.

use super::delay::{DelayLength, DelayLine};
use super::{sanitize, Effect, StereoSample, SAMPLE_MAX, SAMPLE_MIN};

/// Tap lengths: 50 ms, 100 ms, 150 ms (fixed frame count), 40 ms, 80 ms
pub const REVERB_TAPS: [DelayLength; 5] = [
    DelayLength::SecondDivisor(20),
    DelayLength::SecondDivisor(10),
    DelayLength::Frames(6610),
    DelayLength::SecondDivisor(25),
    DelayLength::SecondDivisor(12),
];

/// Undamped gains of the first three taps
const DIRECT_TAP_GAINS: [f32; 3] = [0.5, 0.4, 0.3];

/// Gains of the two damped taps before the `1 - damping` weighting
const DAMPED_TAP_GAINS: [f32; 2] = [0.3, 0.15];

/// Portion of the tap sum mixed into the output
pub const REVERB_MIX: f32 = 0.2;

pub struct Reverb {
    lines: [DelayLine<f32>; 5],
    feedback: f32,
    damping: f32,
}

impl Reverb {
    pub fn new(sample_rate: u32, feedback: f32, damping: f32) -> Self {
        Self {
            lines: REVERB_TAPS.map(|tap| DelayLine::with_length(sample_rate, tap)),
            feedback,
            damping,
        }
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback;
    }

    pub fn set_damping(&mut self, damping: f32) {
        self.damping = damping;
    }

    pub fn delay_lines(&self) -> &[DelayLine<f32>; 5] {
        &self.lines
    }

    /// Weighted sum of the five taps at their current cursors
    fn tap_sum(&self) -> f32 {
        let undamped = 1.0 - self.damping;
        let mut sum = 0.0;
        for (line, gain) in self.lines[..3].iter().zip(DIRECT_TAP_GAINS) {
            sum += line.read_at_offset(line.len()) * gain;
        }
        for (line, gain) in self.lines[3..].iter().zip(DAMPED_TAP_GAINS) {
            sum += line.read_at_offset(line.len()) * gain * undamped;
        }
        sum
    }
}

impl Effect for Reverb {
    fn name(&self) -> &'static str {
        "reverb"
    }

    fn process(&mut self, dry: StereoSample, wet: &mut StereoSample) {
        let sum = self.tap_sum();
        wet.add_mono(sum * REVERB_MIX);

        let input = sanitize(dry.mono() + sum * self.feedback).clamp(SAMPLE_MIN, SAMPLE_MAX);
        for line in self.lines.iter_mut() {
            line.write_and_advance(input);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_impulse(reverb: &mut Reverb, frames: usize) -> Vec<f32> {
        let mut out = Vec::with_capacity(frames);
        for i in 0..frames {
            let dry = if i == 0 {
                StereoSample::new(10000.0, 10000.0)
            } else {
                StereoSample::default()
            };
            let mut wet = StereoSample::default();
            reverb.process(dry, &mut wet);
            out.push(wet.left);
        }
        out
    }

    #[test]
    fn test_tap_lengths_at_44100() {
        let reverb = Reverb::new(44100, 0.5, 0.6);
        let lengths: Vec<usize> = reverb.delay_lines().iter().map(|l| l.len()).collect();
        assert_eq!(lengths, vec![2205, 4410, 6610, 1764, 3675]);
    }

    #[test]
    fn test_first_reflection_arrives_on_shortest_tap() {
        let mut reverb = Reverb::new(44100, 0.0, 0.0);
        let out = run_impulse(&mut reverb, 2000);
        // The 40 ms tap (1764 frames) answers first: 10000 * 0.3 * 0.2
        assert!(out[..1764].iter().all(|&v| v == 0.0));
        assert!((out[1764] - 600.0).abs() < 1e-3);
    }

    #[test]
    fn test_full_damping_silences_damped_taps() {
        let mut reverb = Reverb::new(44100, 0.0, 1.0);
        let out = run_impulse(&mut reverb, 2300);
        assert_eq!(out[1764], 0.0);
        // The 50 ms tap still sounds: 10000 * 0.5 * 0.2
        assert!((out[2205] - 1000.0).abs() < 1e-3);
    }

    #[test]
    fn test_default_feedback_decays() {
        let mut reverb = Reverb::new(44100, 0.5, 0.6);
        let out = run_impulse(&mut reverb, 44100 * 3);
        let early = out[..44100].iter().fold(0.0f32, |m, v| m.max(v.abs()));
        let late = out[2 * 44100..].iter().fold(0.0f32, |m, v| m.max(v.abs()));
        assert!(out.iter().all(|v| v.is_finite()));
        assert!(late < early * 0.1, "tail should decay: early={} late={}", early, late);
    }

    #[test]
    fn test_high_feedback_saturates_lines() {
        // Loop gain is about 1.24 here; the stored values must stay in range
        let mut reverb = Reverb::new(8000, 0.9, 0.6);
        for i in 0..8000 * 30 {
            let level = if (i / 20) % 2 == 0 { 10000.0 } else { -10000.0 };
            let dry = StereoSample::new(level, level);
            let mut wet = dry;
            reverb.process(dry, &mut wet);
            assert!(wet.left.is_finite());
        }
        for line in reverb.delay_lines() {
            assert!(line
                .as_slice()
                .iter()
                .all(|v| (SAMPLE_MIN..=SAMPLE_MAX).contains(v)));
        }
    }
}
