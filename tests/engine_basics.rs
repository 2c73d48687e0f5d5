// Integration tests for basic Engine functionality

use echofx::{EffectSettings, Engine, EngineConfig, Param, Toggle};

fn engine_with(settings: EffectSettings) -> Engine {
    Engine::new(EngineConfig::default().with_settings(settings)).unwrap()
}

#[test]
fn test_engine_creation() {
    let engine = Engine::new(EngineConfig::default()).unwrap();

    assert_eq!(engine.sample_rate(), 44100);
    assert_eq!(engine.block_frames(), 1024);
    assert_eq!(engine.settings(), EffectSettings::default());
}

#[test]
fn test_delay_lengths_follow_sample_rate() {
    let engine = Engine::new(EngineConfig::new(48000)).unwrap();

    assert_eq!(engine.echo().delay_line().len(), 12000);
    let reverb: Vec<usize> = engine.reverb().delay_lines().iter().map(|l| l.len()).collect();
    assert_eq!(reverb, vec![2400, 4800, 6610, 1920, 4000]);
    let chorus: Vec<usize> = engine.chorus().delay_lines().iter().map(|l| l.len()).collect();
    assert_eq!(chorus, vec![480, 661, 960]);
    assert_eq!(engine.stereo_widener().delay_line().len(), 240);
}

#[test]
fn test_invalid_config_is_rejected() {
    assert!(Engine::new(EngineConfig::new(100)).is_err());
    assert!(Engine::new(EngineConfig::default().with_block_frames(0)).is_err());
}

#[test]
fn test_bypass_applies_volume_only() {
    let mut engine = engine_with(EffectSettings::bypass());

    let mut block: Vec<i16> = (0..512).map(|i| ((i * 97) % 20000 - 10000) as i16).collect();
    let input = block.clone();
    let report = engine.process_block(&mut block);

    assert_eq!(report.frames, 256);
    assert!(!report.normalized());
    assert_eq!(report.total_clip_events(), 0);
    for (out, inp) in block.iter().zip(&input) {
        assert_eq!(*out, (*inp as f32 * 0.65).round() as i16);
    }
}

#[test]
fn test_full_volume_bypass_is_identity() {
    let mut settings = EffectSettings::bypass();
    settings.global_volume = 1.0;
    let mut engine = engine_with(settings);

    let mut block = vec![-32767i16, i16::MAX, -1, 1, 12345, -12345];
    let input = block.clone();
    engine.process_block(&mut block);
    assert_eq!(block, input);
}

#[test]
fn test_zero_volume_mutes_everything() {
    let mut engine = engine_with(EffectSettings::default());
    engine.controls().set_param(Param::GlobalVolume, 0.0);

    for _ in 0..20 {
        let mut block = vec![20000i16; 2048];
        engine.process_block(&mut block);
        assert!(block.iter().all(|&s| s == 0));
    }
}

#[test]
fn test_silence_in_silence_out() {
    let mut engine = engine_with(EffectSettings::default());

    let mut block = vec![0i16; 200];
    let report = engine.process_block(&mut block);

    assert!(block.iter().all(|&s| s == 0));
    assert_eq!(report.peak, 0.0);
    assert_eq!(report.scale, None);
}

#[test]
fn test_single_stage_settings() {
    let settings = EffectSettings::only(Toggle::Reverb);
    for toggle in Toggle::ALL {
        assert_eq!(settings.is_enabled(toggle), toggle == Toggle::Reverb);
    }
}

#[test]
fn test_settings_summary_lists_every_control() {
    let summary = EffectSettings::default().to_string();
    assert!(summary.starts_with("Effect Settings:"));
    for toggle in Toggle::ALL {
        assert!(summary.contains(toggle.label()), "missing {}", toggle.label());
    }
}

#[test]
fn test_key_toggles_reach_engine() {
    let mut engine = engine_with(EffectSettings::default());
    let controls = engine.controls();

    assert_eq!(controls.handle_key('e'), Some((Toggle::Echo, false)));
    assert_eq!(controls.handle_key('S'), Some((Toggle::Stereo, false)));
    assert_eq!(controls.handle_key('x'), None);

    let mut block = vec![0i16; 64];
    engine.process_block(&mut block);
    assert!(!engine.settings().echo_enabled);
    assert!(!engine.settings().stereo_enabled);
    assert!(engine.settings().reverb_enabled);
}
