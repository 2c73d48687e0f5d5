use std::sync::Arc;

use crate::config::EngineConfig;
use crate::control::{EffectControls, EffectSettings, Toggle};
use crate::effects::{
    peak, to_i16, BlockNormalizer, Chorus, Echo, Effect, Reverb, StereoSample, StereoWidener,
    Tremolo, Vibrato,
};

pub mod lfo;
pub use lfo::Lfo;

/// Every stage of the chain, in processing order
///
/// Each stage keeps its delay lines and phases for the lifetime of the engine.
/// A disabled stage is simply not called, so its history stays frozen until it
/// is switched back on.
struct EffectRack {
    echo: Echo,
    reverb: Reverb,
    chorus: Chorus,
    vibrato: Vibrato,
    tremolo: Tremolo,
    stereo: StereoWidener,
}

impl EffectRack {
    fn new(sample_rate: u32, settings: &EffectSettings) -> Self {
        Self {
            echo: Echo::new(sample_rate),
            reverb: Reverb::new(sample_rate, settings.reverb_feedback, settings.reverb_damping),
            chorus: Chorus::new(sample_rate, settings.chorus_depth, settings.chorus_speed),
            vibrato: Vibrato::new(sample_rate),
            tremolo: Tremolo::new(sample_rate),
            stereo: StereoWidener::new(sample_rate),
        }
    }

    fn apply(&mut self, settings: &EffectSettings) {
        self.reverb.set_feedback(settings.reverb_feedback);
        self.reverb.set_damping(settings.reverb_damping);
        self.chorus.set_depth(settings.chorus_depth);
        self.chorus.set_speed(settings.chorus_speed);
    }

    fn stage_mut(&mut self, toggle: Toggle) -> &mut dyn Effect {
        match toggle {
            Toggle::Echo => &mut self.echo,
            Toggle::Reverb => &mut self.reverb,
            Toggle::Chorus => &mut self.chorus,
            Toggle::Vibrato => &mut self.vibrato,
            Toggle::Tremolo => &mut self.tremolo,
            Toggle::Stereo => &mut self.stereo,
        }
    }
}

/// Diagnostics gathered while processing one block
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BlockReport {
    /// Complete frames processed
    pub frames: usize,
    /// Largest absolute accumulator value before normalization
    pub peak: f32,
    /// Scale applied by block normalization, if any
    pub scale: Option<f32>,
    /// Frames that left the 16-bit range after each stage, indexed by [`Toggle`]
    pub clip_events: [u32; 6],
}

impl BlockReport {
    pub fn clip_events_after(&self, toggle: Toggle) -> u32 {
        self.clip_events[toggle as usize]
    }

    pub fn total_clip_events(&self) -> u32 {
        self.clip_events.iter().sum()
    }

    pub fn normalized(&self) -> bool {
        self.scale.is_some()
    }
}

/// Totals over a run of blocks
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StreamSummary {
    pub blocks: usize,
    pub normalized_blocks: usize,
    pub clip_events: u32,
    pub peak: f32,
}

impl StreamSummary {
    fn add(&mut self, report: &BlockReport) {
        self.blocks += 1;
        if report.normalized() {
            self.normalized_blocks += 1;
        }
        self.clip_events += report.total_clip_events();
        self.peak = self.peak.max(report.peak);
    }
}

/// Post-processing engine for interleaved 16-bit stereo blocks
///
/// Owns every delay line, phase and the scratch accumulator. Call
/// [`process_block`](Engine::process_block) once per audio callback; toggles
/// and parameters are changed through the shared [`EffectControls`].
pub struct Engine {
    sample_rate: u32,
    controls: Arc<EffectControls>,
    rack: EffectRack,
    normalizer: BlockNormalizer,
    // Per-sample accumulators of one configured block, narrowed to i16 after normalization.
    // Sized once; never grown on the audio thread.
    scratch: Vec<f32>,
    block_frames: usize,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self, anyhow::Error> {
        config.validate()?;
        let controls = Arc::new(EffectControls::new(&config.settings));
        let settings = controls.snapshot();

        log::debug!(
            "Engine created: {} Hz, {} frames per block",
            config.sample_rate,
            config.block_frames
        );

        Ok(Self {
            sample_rate: config.sample_rate,
            controls,
            rack: EffectRack::new(config.sample_rate, &settings),
            normalizer: BlockNormalizer::default(),
            scratch: vec![0.0; config.block_frames * 2],
            block_frames: config.block_frames,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn block_frames(&self) -> usize {
        self.block_frames
    }

    /// Shared control surface; clone it into the control thread
    pub fn controls(&self) -> Arc<EffectControls> {
        self.controls.clone()
    }

    /// Current toggles and parameters
    pub fn settings(&self) -> EffectSettings {
        self.controls.snapshot()
    }

    /// Process one block of interleaved stereo samples in place
    ///
    /// Toggles and parameters are read once at the start of the block. A
    /// trailing odd sample is left untouched. A block longer than the
    /// configured size is processed as consecutive configured-size blocks,
    /// each normalized on its own; the report then carries the smallest scale.
    pub fn process_block(&mut self, block: &mut [i16]) -> BlockReport {
        let settings = self.controls.snapshot();
        self.rack.apply(&settings);

        let frames = block.len() / 2;
        let samples = frames * 2;
        if samples != block.len() {
            log::warn!(
                "Block of {} samples is not whole stereo frames; last sample skipped",
                block.len()
            );
        }

        let mut report = BlockReport {
            frames,
            ..BlockReport::default()
        };
        for chunk in block[..samples].chunks_mut(self.scratch.len()) {
            self.process_chunk(chunk, &settings, &mut report);
        }
        report
    }

    fn process_chunk(
        &mut self,
        chunk: &mut [i16],
        settings: &EffectSettings,
        report: &mut BlockReport,
    ) {
        let volume = settings.global_volume;

        for (frame, acc) in chunk.chunks_exact(2).zip(self.scratch.chunks_exact_mut(2)) {
            let dry = StereoSample::new(frame[0] as f32 * volume, frame[1] as f32 * volume);
            let mut wet = dry;

            for toggle in Toggle::ALL {
                if !settings.is_enabled(toggle) {
                    continue;
                }
                let stage = self.rack.stage_mut(toggle);
                stage.process(dry, &mut wet);

                if wet.exceeds_headroom() {
                    report.clip_events[toggle as usize] += 1;
                    log::debug!(
                        "Clipping after {}: left={:.0}, right={:.0}",
                        stage.name(),
                        wet.left,
                        wet.right
                    );
                }
            }

            acc[0] = wet.left;
            acc[1] = wet.right;
        }

        let scratch = &mut self.scratch[..chunk.len()];
        report.peak = report.peak.max(peak(scratch));
        if let Some(scale) = self.normalizer.process(scratch) {
            report.scale = Some(report.scale.map_or(scale, |s| s.min(scale)));
        }

        for (out, value) in chunk.iter_mut().zip(scratch.iter()) {
            *out = to_i16(*value);
        }
    }

    /// Process a long interleaved buffer as a sequence of blocks
    pub fn process_stream(&mut self, samples: &mut [i16]) -> StreamSummary {
        let mut summary = StreamSummary::default();
        for block in samples.chunks_mut(self.scratch.len()) {
            let report = self.process_block(block);
            summary.add(&report);
        }
        summary
    }

    pub fn echo(&self) -> &Echo {
        &self.rack.echo
    }

    pub fn reverb(&self) -> &Reverb {
        &self.rack.reverb
    }

    pub fn chorus(&self) -> &Chorus {
        &self.rack.chorus
    }

    pub fn vibrato(&self) -> &Vibrato {
        &self.rack.vibrato
    }

    pub fn tremolo(&self) -> &Tremolo {
        &self.rack.tremolo
    }

    pub fn stereo_widener(&self) -> &StereoWidener {
        &self.rack.stereo
    }
}
