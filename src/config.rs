use crate::control::EffectSettings;
use crate::effects::STEREO_DELAY;

/// Default sample rate in Hz
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Default block size in frames (about 23 ms at 44.1 kHz)
pub const DEFAULT_BLOCK_FRAMES: usize = 1024;

/// Construction-time configuration for an [`Engine`](crate::engine::Engine)
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Sample rate in Hz; every delay length is derived from it
    pub sample_rate: u32,
    /// Expected frames per block, used to size the scratch buffer up front
    pub block_frames: usize,
    /// Initial toggles and parameters
    pub settings: EffectSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            block_frames: DEFAULT_BLOCK_FRAMES,
            settings: EffectSettings::default(),
        }
    }
}

impl EngineConfig {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            ..Self::default()
        }
    }

    pub fn with_block_frames(mut self, block_frames: usize) -> Self {
        self.block_frames = block_frames;
        self
    }

    pub fn with_settings(mut self, settings: EffectSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Reject configurations that would produce empty delay lines or blocks
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if STEREO_DELAY.frames(self.sample_rate) == 0 {
            return Err(anyhow::anyhow!(
                "Sample rate {} Hz is too low; at least 200 Hz is required",
                self.sample_rate
            ));
        }
        if self.block_frames == 0 {
            return Err(anyhow::anyhow!("Block size must be at least one frame"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert_eq!(config.sample_rate, 44100);
        assert_eq!(config.block_frames, 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_low_sample_rate_rejected() {
        assert!(EngineConfig::new(199).validate().is_err());
        assert!(EngineConfig::new(200).validate().is_ok());
    }

    #[test]
    fn test_zero_block_rejected() {
        let config = EngineConfig::default().with_block_frames(0);
        assert!(config.validate().is_err());
    }
}
