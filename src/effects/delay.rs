//! Fixed-capacity circular delay line
//!
//! Every time-based stage in the chain (echo, reverb taps, chorus voices,
//! stereo widener) is built on this one primitive. The capacity is the delay
//! length in frames, so reading at an offset equal to the capacity yields the
//! sample written exactly one buffer-length ago.

/// Circular buffer with a single write cursor
///
/// The buffer is allocated once at construction and never resized. The cursor
/// always sits on the oldest sample, which is also the slot the next write
/// will overwrite.
#[derive(Clone, Debug)]
pub struct DelayLine<T> {
    buffer: Vec<T>,
    cursor: usize,
}

impl<T: Copy + Default> DelayLine<T> {
    /// Create a zero-initialized delay line holding `capacity` samples
    ///
    /// A zero capacity is bumped to one so index arithmetic never divides by zero.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![T::default(); capacity.max(1)],
            cursor: 0,
        }
    }

    /// Create a delay line sized for `length` at `sample_rate`
    pub fn with_length(sample_rate: u32, length: DelayLength) -> Self {
        Self::new(length.frames(sample_rate))
    }

    /// Store `value` at the cursor, then advance the cursor by one
    #[inline]
    pub fn write_and_advance(&mut self, value: T) {
        self.buffer[self.cursor] = value;
        self.cursor += 1;
        if self.cursor == self.buffer.len() {
            self.cursor = 0;
        }
    }

    /// Return the value written `offset` frames ago without mutating anything
    ///
    /// `offset` is taken modulo the capacity, so both `0` and `len()` land on
    /// the cursor slot.
    #[inline]
    pub fn read_at_offset(&self, offset: usize) -> T {
        let len = self.buffer.len();
        let index = (self.cursor + len - offset % len) % len;
        self.buffer[index]
    }

    /// Capacity in frames
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Current write position
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Raw storage, in physical (not chronological) order
    pub fn as_slice(&self) -> &[T] {
        &self.buffer
    }
}

/// How a delay line's capacity is derived
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DelayLength {
    /// `1/n` of a second, truncated (44100 Hz / 4 = 11025 frames for 250 ms)
    SecondDivisor(u32),
    /// Hand-picked frame count that does not follow the sample rate
    Frames(usize),
}

impl DelayLength {
    pub fn frames(self, sample_rate: u32) -> usize {
        match self {
            DelayLength::SecondDivisor(divisor) => (sample_rate / divisor.max(1)) as usize,
            DelayLength::Frames(frames) => frames,
        }
    }
}
