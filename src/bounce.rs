//! Offline render of a WAV file through the effect chain
//!
//! The input is read completely, processed in engine-sized blocks exactly as
//! the audio callback would see them, and written back out as 16-bit stereo.

use std::path::Path;

use anyhow::Context;

use crate::config::EngineConfig;
use crate::engine::{Engine, StreamSummary};

/// Render `input` through a fresh engine into `output`
///
/// The engine runs at the file's sample rate; `config.sample_rate` is ignored.
/// The input must be 16-bit integer PCM, mono or stereo. Mono input is
/// duplicated to both channels.
pub fn bounce_wav(
    input: &Path,
    output: &Path,
    config: EngineConfig,
) -> Result<StreamSummary, anyhow::Error> {
    let mut reader = hound::WavReader::open(input)
        .with_context(|| format!("Failed to open {}", input.display()))?;
    let spec = reader.spec();

    if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(anyhow::anyhow!(
            "{} is not 16-bit PCM ({:?}, {} bits)",
            input.display(),
            spec.sample_format,
            spec.bits_per_sample
        ));
    }

    let raw: Vec<i16> = reader
        .samples::<i16>()
        .collect::<Result<_, _>>()
        .with_context(|| format!("Failed to read samples from {}", input.display()))?;

    let mut samples: Vec<i16> = match spec.channels {
        1 => raw.iter().flat_map(|&s| [s, s]).collect(),
        2 => raw,
        n => return Err(anyhow::anyhow!("Unsupported channel count {}", n)),
    };

    let config = EngineConfig {
        sample_rate: spec.sample_rate,
        ..config
    };
    log::info!(
        "Bouncing {} ({} frames at {} Hz)",
        input.display(),
        samples.len() / 2,
        spec.sample_rate
    );
    let mut engine = Engine::new(config)?;
    let summary = engine.process_stream(&mut samples);

    let out_spec = hound::WavSpec {
        channels: 2,
        sample_rate: spec.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(output, out_spec)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    for sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    log::info!(
        "Wrote {}: {} blocks, {} normalized, {} clip events",
        output.display(),
        summary.blocks,
        summary.normalized_blocks,
        summary.clip_events
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::EffectSettings;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("echofx_{}_{}.wav", name, std::process::id()))
    }

    #[test]
    fn test_bounce_mono_file_bypass() {
        let input = temp_path("in_mono");
        let output = temp_path("out_mono");

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&input, spec).unwrap();
        for i in 0..4000i32 {
            writer.write_sample(((i % 200) * 100 - 10000) as i16).unwrap();
        }
        writer.finalize().unwrap();

        let mut settings = EffectSettings::bypass();
        settings.global_volume = 0.5;
        let config = EngineConfig::default().with_settings(settings);
        let summary = bounce_wav(&input, &output, config).unwrap();
        assert_eq!(summary.normalized_blocks, 0);

        let mut reader = hound::WavReader::open(&output).unwrap();
        assert_eq!(reader.spec().channels, 2);
        assert_eq!(reader.spec().sample_rate, 8000);
        let out: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(out.len(), 8000);
        assert_eq!(out[0], -5000);
        assert_eq!(out[1], -5000);

        let _ = std::fs::remove_file(input);
        let _ = std::fs::remove_file(output);
    }

    #[test]
    fn test_bounce_rejects_float_input() {
        let input = temp_path("in_float");
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 44100,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(&input, spec).unwrap();
        writer.write_sample(0.0f32).unwrap();
        writer.write_sample(0.0f32).unwrap();
        writer.finalize().unwrap();

        let result = bounce_wav(&input, &temp_path("out_float"), EngineConfig::default());
        assert!(result.is_err());
        let _ = std::fs::remove_file(input);
    }
}
