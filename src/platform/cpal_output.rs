use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    Device, FromSample, Sample, SizedSample, Stream, StreamConfig,
};

use super::AudioOutput;
use crate::engine::Engine;
use crate::gen::BlockSource;

/// Output stream that runs every device callback through the engine
///
/// The engine and the source are moved into the callback; the control thread
/// keeps talking to the engine through its shared `EffectControls`.
pub struct CpalOutput {
    stream: Option<Stream>,
    device: Option<Device>,
    config: Option<StreamConfig>,
    sample_rate: u32,
    is_active: bool,
}

impl CpalOutput {
    pub fn new() -> Self {
        Self {
            stream: None,
            device: None,
            config: None,
            sample_rate: 44100,
            is_active: false,
        }
    }

    /// Create the output stream feeding `source` through `engine`
    pub fn create_stream(
        &mut self,
        engine: Engine,
        source: Box<dyn BlockSource>,
    ) -> Result<(), anyhow::Error> {
        let device = self.device.as_ref().ok_or_else(|| anyhow::anyhow!("Device not initialized"))?;
        let config = self.config.as_ref().ok_or_else(|| anyhow::anyhow!("Config not initialized"))?;

        if engine.sample_rate() != self.sample_rate {
            return Err(anyhow::anyhow!(
                "Engine runs at {} Hz but the device runs at {} Hz",
                engine.sample_rate(),
                self.sample_rate
            ));
        }

        let supported_config = device.default_output_config()?;
        let stream = match supported_config.sample_format() {
            cpal::SampleFormat::I16 => Self::make_stream::<i16>(device, config, engine, source)?,
            cpal::SampleFormat::I32 => Self::make_stream::<i32>(device, config, engine, source)?,
            cpal::SampleFormat::U16 => Self::make_stream::<u16>(device, config, engine, source)?,
            cpal::SampleFormat::F32 => Self::make_stream::<f32>(device, config, engine, source)?,
            cpal::SampleFormat::F64 => Self::make_stream::<f64>(device, config, engine, source)?,
            sample_format => return Err(anyhow::anyhow!("Unsupported sample format '{}'", sample_format)),
        };

        self.stream = Some(stream);
        Ok(())
    }

    /// Setup the CPAL host and device
    fn setup_host_device(&mut self, sample_rate: u32) -> Result<(), anyhow::Error> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow::anyhow!("Default output device is not available"))?;

        log::info!("Output device: {}", device.name()?);

        let default_config = device.default_output_config()?;
        log::debug!("Default output config: {:?}", default_config);

        // The engine works on interleaved stereo; ask for it explicitly
        let mut config: StreamConfig = default_config.into();
        config.channels = 2;
        config.sample_rate = cpal::SampleRate(sample_rate);

        self.sample_rate = sample_rate;
        self.device = Some(device);
        self.config = Some(config);

        Ok(())
    }

    /// Create a typed stream for the given sample format
    fn make_stream<T>(
        device: &Device,
        config: &StreamConfig,
        mut engine: Engine,
        mut source: Box<dyn BlockSource>,
    ) -> Result<Stream, anyhow::Error>
    where
        T: SizedSample + FromSample<i16>,
    {
        let mut block = vec![0i16; engine.block_frames() * 2];

        let err_fn = |err| log::error!("Error building output sound stream: {}", err);

        let stream = device.build_output_stream(
            config,
            move |output: &mut [T], _: &cpal::OutputCallbackInfo| {
                // Device buffers of any size are served in engine-sized blocks
                for chunk in output.chunks_mut(block.len()) {
                    let block = &mut block[..chunk.len()];

                    source.fill(block);
                    engine.process_block(block);

                    for (out, &sample) in chunk.iter_mut().zip(block.iter()) {
                        *out = T::from_sample(sample);
                    }
                }
            },
            err_fn,
            None,
        )?;

        Ok(stream)
    }
}

impl Default for CpalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioOutput for CpalOutput {
    fn initialize(&mut self, sample_rate: u32) -> Result<(), anyhow::Error> {
        self.setup_host_device(sample_rate)
    }

    fn start(&mut self) -> Result<(), anyhow::Error> {
        if let Some(stream) = &self.stream {
            stream.play()?;
            self.is_active = true;
            log::info!("Audio stream started at sample rate: {}", self.sample_rate);
        } else {
            return Err(anyhow::anyhow!("Stream not created. Call create_stream first."));
        }

        Ok(())
    }

    fn stop(&mut self) -> Result<(), anyhow::Error> {
        if let Some(stream) = &self.stream {
            stream.pause()?;
            self.is_active = false;
            log::info!("Audio stream stopped");
        }

        Ok(())
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}
