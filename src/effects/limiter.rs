//! Block-level dynamic range control
//!
//! Stages are allowed to push the accumulator past the 16-bit range. Instead of
//! clipping sample by sample, the whole block is rescaled once it is complete,
//! so an early transient lowers the gain of the entire block uniformly. This
//! trades up to one block of response latency for a consistent gain across it.

use super::{SAMPLE_MAX, SAMPLE_MIN};

/// Peak normalizer applied to a finished block
pub struct BlockNormalizer {
    pub ceiling: f32,
}

impl BlockNormalizer {
    pub fn new(ceiling: f32) -> Self {
        Self { ceiling }
    }

    /// Rescale `block` in place if its peak exceeds the ceiling
    ///
    /// Returns the applied scale, or `None` when the block already fits.
    pub fn process(&self, block: &mut [f32]) -> Option<f32> {
        let peak = peak(block);
        if peak <= self.ceiling {
            return None;
        }

        let scale = self.ceiling / peak;
        for sample in block.iter_mut() {
            *sample *= scale;
        }
        log::info!(
            "Final normalization applied: scale={:.3}, peak={:.1}",
            scale,
            peak
        );
        Some(scale)
    }
}

impl Default for BlockNormalizer {
    fn default() -> Self {
        Self::new(SAMPLE_MAX)
    }
}

/// Largest absolute value in `block`
pub fn peak(block: &[f32]) -> f32 {
    block.iter().fold(0.0f32, |max, v| max.max(v.abs()))
}

/// Narrow an accumulator value to a 16-bit sample
#[inline]
pub fn to_i16(value: f32) -> i16 {
    value.round().clamp(SAMPLE_MIN, SAMPLE_MAX) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_block_is_untouched() {
        let normalizer = BlockNormalizer::default();
        let mut block = vec![100.0, -32767.0, 32767.0, 0.0];
        let before = block.clone();
        assert_eq!(normalizer.process(&mut block), None);
        assert_eq!(block, before);
    }

    #[test]
    fn test_loud_block_is_scaled_uniformly() {
        let normalizer = BlockNormalizer::default();
        let mut block = vec![1000.0, -65534.0, 20000.0, -3.5];
        let before = block.clone();

        let scale = normalizer.process(&mut block).unwrap();
        assert_eq!(scale, 32767.0 / 65534.0);
        for (after, before) in block.iter().zip(&before) {
            assert_eq!(*after, before * scale);
        }
        assert!((peak(&block) - 32767.0).abs() < 1e-2);
    }

    #[test]
    fn test_negative_full_scale_triggers_rescale() {
        let normalizer = BlockNormalizer::default();
        let mut block = vec![-32768.0, 0.0];
        let scale = normalizer.process(&mut block).unwrap();
        assert_eq!(scale, 32767.0 / 32768.0);
    }

    #[test]
    fn test_to_i16_rounds_and_saturates() {
        assert_eq!(to_i16(1.4), 1);
        assert_eq!(to_i16(-1.6), -2);
        assert_eq!(to_i16(40000.0), i16::MAX);
        assert_eq!(to_i16(-40000.0), i16::MIN);
        assert_eq!(to_i16(-0.0), 0);
    }
}
