use std::f64::consts::TAU;

/// Free-running modulation phase in radians
///
/// Drives the chorus voices, vibrato and tremolo. The phase lives in
/// `[0, 2π)`, advances by `2π·f/sample_rate` per frame and wraps by
/// subtraction so there is never a discontinuity. It is never reset.
#[derive(Clone, Debug)]
pub struct Lfo {
    phase: f64,
    sample_rate: f64,
}

impl Lfo {
    /// Create an oscillator starting at `initial_phase` radians
    pub fn new(initial_phase: f64, sample_rate: u32) -> Self {
        Self {
            phase: initial_phase.rem_euclid(TAU),
            sample_rate: sample_rate as f64,
        }
    }

    /// Sine of the current phase, in [-1, 1]
    #[inline]
    pub fn sin(&self) -> f32 {
        self.phase.sin() as f32
    }

    /// Advance the phase by one frame at `frequency_hz`
    #[inline]
    pub fn advance(&mut self, frequency_hz: f32) {
        self.phase += TAU * frequency_hz as f64 / self.sample_rate;
        if self.phase >= TAU {
            self.phase -= TAU;
        }
    }

    /// Current phase in radians
    pub fn phase(&self) -> f64 {
        self.phase
    }
}

/// Shortest distance between two phases on the circle
pub fn phase_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(TAU);
    d.min(TAU - d)
}
