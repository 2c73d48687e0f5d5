pub mod tone;
pub mod waveform;

pub use self::tone::*;
pub use self::waveform::*;

/// Producer of already-synthesized interleaved stereo blocks
///
/// The playback host asks the source for a block, runs it through the engine
/// and hands it to the device.
pub trait BlockSource: Send {
    /// Overwrite `block` with the next interleaved frames
    fn fill(&mut self, block: &mut [i16]);
}
