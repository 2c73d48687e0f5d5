// Integration tests for delay and modulation timing across block boundaries

use echofx::engine::lfo::phase_distance;
use echofx::gen::{BlockSource, ToneSource, Waveform};
use echofx::{EffectSettings, Engine, EngineConfig, Toggle};

fn full_volume_engine(toggle: Toggle, block_frames: usize) -> Engine {
    let mut settings = EffectSettings::only(toggle);
    settings.global_volume = 1.0;
    let config = EngineConfig::default()
        .with_block_frames(block_frames)
        .with_settings(settings);
    Engine::new(config).unwrap()
}

/// Run `frames` frames through `engine` in blocks, with an impulse on frame 0
fn render_impulse(engine: &mut Engine, frames: usize, amplitude: i16) -> Vec<i16> {
    let mut samples = vec![0i16; frames * 2];
    samples[0] = amplitude;
    samples[1] = amplitude;
    engine.process_stream(&mut samples);
    samples
}

#[test]
fn test_echo_arrives_after_quarter_second() {
    let mut engine = full_volume_engine(Toggle::Echo, 1024);
    let out = render_impulse(&mut engine, 12 * 1024, 10000);

    assert_eq!(out[0], 10000);
    assert_eq!(out[1], 10000);
    for frame in 1..(12 * 1024) {
        let expected = if frame == 11025 { 3000 } else { 0 };
        assert_eq!(out[frame * 2], expected, "left, frame {}", frame);
        assert_eq!(out[frame * 2 + 1], expected, "right, frame {}", frame);
    }
}

#[test]
fn test_echo_timing_does_not_depend_on_block_size() {
    let mut small = full_volume_engine(Toggle::Echo, 100);
    let mut large = full_volume_engine(Toggle::Echo, 4096);

    let a = render_impulse(&mut small, 12000, 8000);
    let b = render_impulse(&mut large, 12000, 8000);
    assert_eq!(a, b);
}

#[test]
fn test_stereo_delay_is_five_milliseconds() {
    let mut engine = full_volume_engine(Toggle::Stereo, 64);
    let out = render_impulse(&mut engine, 300, 10000);

    for frame in 1..300 {
        let (left, right) = (out[frame * 2], out[frame * 2 + 1]);
        if frame == 220 {
            assert_eq!((left, right), (5000, -5000));
        } else {
            assert_eq!((left, right), (0, 0), "frame {}", frame);
        }
    }
}

#[test]
fn test_chorus_phases_are_periodic() {
    // 3 Hz at 44.1 kHz: one full cycle every 14700 frames
    let mut engine = full_volume_engine(Toggle::Chorus, 700);
    let initial = engine.chorus().phases();

    let mut samples = vec![0i16; 14700 * 2];
    engine.process_stream(&mut samples);

    for (phase, start) in engine.chorus().phases().iter().zip(initial) {
        assert!(phase_distance(*phase, start) < 1e-6, "{} vs {}", phase, start);
    }

    let mut half = vec![0i16; 7350 * 2];
    engine.process_stream(&mut half);
    for (phase, start) in engine.chorus().phases().iter().zip(initial) {
        assert!((phase_distance(*phase, start) - std::f64::consts::PI).abs() < 1e-6);
    }
}

#[test]
fn test_vibrato_and_tremolo_share_three_hertz() {
    let mut settings = EffectSettings::bypass();
    settings.vibrato_enabled = true;
    settings.tremolo_enabled = true;
    let mut engine = Engine::new(EngineConfig::default().with_settings(settings)).unwrap();

    let mut samples = vec![0i16; 14700 * 2];
    engine.process_stream(&mut samples);

    assert!(phase_distance(engine.vibrato().phase(), 0.0) < 1e-6);
    assert!(phase_distance(engine.tremolo().phase(), 0.0) < 1e-6);
}

#[test]
fn test_square_wave_through_stereo_widener() {
    // 50 Hz square: the first 441 frames are the positive half
    let mut tone = ToneSource::new(44100, 50.0, Waveform::Square).with_amplitude(0.3);
    let mut engine = full_volume_engine(Toggle::Stereo, 441);

    let mut block = vec![0i16; 441 * 2];
    tone.fill(&mut block);
    let high = block[0];
    assert_eq!(high, 9830);

    let report = engine.process_block(&mut block);
    assert!(!report.normalized());

    for frame in 0..220 {
        assert_eq!(block[frame * 2], high);
        assert_eq!(block[frame * 2 + 1], high);
    }
    for frame in 220..441 {
        assert_eq!(block[frame * 2], high + high / 2);
        assert_eq!(block[frame * 2 + 1], high - high / 2);
    }
}
