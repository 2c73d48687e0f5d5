use std::f64::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Saw,
    Triangle,
}

impl Waveform {
    /// Value of the waveform at `phase` radians, in [-1, 1]
    ///
    /// These are naive (non band-limited) shapes; the square is a true
    /// full-scale square so it can drive the chain to its limits.
    pub fn sample(self, phase: f64) -> f64 {
        let t = phase.rem_euclid(TAU) / TAU;
        match self {
            Waveform::Sine => phase.sin(),
            Waveform::Square => {
                if t < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Saw => 2.0 * t - 1.0,
            Waveform::Triangle => 1.0 - 4.0 * (t - 0.5).abs(),
        }
    }
}
