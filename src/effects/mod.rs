pub mod chorus;
pub mod delay;
pub mod echo;
pub mod limiter;
pub mod reverb;
pub mod stereo_widener;
pub mod tremolo;
pub mod vibrato;

pub use self::chorus::*;
pub use self::delay::*;
pub use self::echo::*;
pub use self::limiter::*;
pub use self::reverb::*;
pub use self::stereo_widener::*;
pub use self::tremolo::*;
pub use self::vibrato::*;

/// Largest positive value representable by a 16-bit sample
pub const SAMPLE_MAX: f32 = 32767.0;

/// Most negative value representable by a 16-bit sample
pub const SAMPLE_MIN: f32 = -32768.0;

/// One frame of the running accumulator, in 16-bit sample units
///
/// Stages add to and scale this pair at `f32` precision; it is only narrowed
/// back to `i16` once the whole block has been normalized.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StereoSample {
    pub left: f32,
    pub right: f32,
}

impl StereoSample {
    pub fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }

    /// Mono downmix written into every delay line
    #[inline]
    pub fn mono(&self) -> f32 {
        (self.left + self.right) * 0.5
    }

    /// Add the same value to both channels
    #[inline]
    pub fn add_mono(&mut self, value: f32) {
        self.left += value;
        self.right += value;
    }

    /// Scale both channels by the same gain
    #[inline]
    pub fn scale(&mut self, gain: f32) {
        self.left *= gain;
        self.right *= gain;
    }

    /// True when either channel is outside the 16-bit range
    #[inline]
    pub fn exceeds_headroom(&self) -> bool {
        !(SAMPLE_MIN..=SAMPLE_MAX).contains(&self.left)
            || !(SAMPLE_MIN..=SAMPLE_MAX).contains(&self.right)
    }
}

/// A stage of the post-processing chain
///
/// Stages own their delay lines and phases. They are only ever called from the
/// audio thread, once per frame while enabled, and must not allocate.
pub trait Effect: Send {
    /// Name used in clipping diagnostics
    fn name(&self) -> &'static str;

    /// Process one frame
    ///
    /// `dry` is the frame after global volume and before any effect; it is what
    /// delay-based stages feed back into their lines. `wet` is the running
    /// accumulator that every stage mutates in turn.
    fn process(&mut self, dry: StereoSample, wet: &mut StereoSample);
}

/// Threshold for flushing denormal numbers to zero in feedback paths
pub(crate) const DENORMAL_THRESHOLD: f32 = 1e-15;

/// Flush denormals and non-finite values before they enter a feedback loop
#[inline]
pub(crate) fn sanitize(value: f32) -> f32 {
    if !value.is_finite() || value.abs() < DENORMAL_THRESHOLD {
        0.0
    } else {
        value
    }
}
