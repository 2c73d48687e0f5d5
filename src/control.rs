//! Effect toggles and parameters
//!
//! `EffectSettings` is a plain snapshot of every toggle and parameter.
//! `EffectControls` is the lock-free version shared between the control path
//! (key presses, FFI calls) and the audio thread. The engine takes one snapshot
//! at the start of every block, so a change lands on a block boundary.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// One switchable stage of the chain
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Toggle {
    Echo,
    Reverb,
    Chorus,
    Vibrato,
    Tremolo,
    Stereo,
}

impl Toggle {
    /// All toggles in processing order
    pub const ALL: [Toggle; 6] = [
        Toggle::Echo,
        Toggle::Reverb,
        Toggle::Chorus,
        Toggle::Vibrato,
        Toggle::Tremolo,
        Toggle::Stereo,
    ];

    /// Hot key that flips this toggle
    pub fn key(self) -> char {
        match self {
            Toggle::Echo => 'E',
            Toggle::Reverb => 'R',
            Toggle::Chorus => 'C',
            Toggle::Vibrato => 'V',
            Toggle::Tremolo => 'T',
            Toggle::Stereo => 'S',
        }
    }

    /// Look up a toggle by its hot key, ignoring case
    pub fn from_key(key: char) -> Option<Toggle> {
        let key = key.to_ascii_uppercase();
        Toggle::ALL.into_iter().find(|t| t.key() == key)
    }

    /// Stable integer id used across the C ABI
    pub fn id(self) -> u32 {
        self as u32
    }

    pub fn from_id(id: u32) -> Option<Toggle> {
        Toggle::ALL.get(id as usize).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Toggle::Echo => "Echo",
            Toggle::Reverb => "Reverb",
            Toggle::Chorus => "Chorus",
            Toggle::Vibrato => "Vibrato",
            Toggle::Tremolo => "Tremolo",
            Toggle::Stereo => "Stereo Widening",
        }
    }
}

impl fmt::Display for Toggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A tunable scalar parameter
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Param {
    ReverbLevel,
    ReverbFeedback,
    ReverbDamping,
    ChorusLevel,
    ChorusDepth,
    ChorusSpeed,
    StereoWidth,
    GlobalVolume,
    LimiterThreshold,
    /// Boolean carried as a float: 0.0 is off, anything else is on
    LimiterEnabled,
}

impl Param {
    pub const ALL: [Param; 10] = [
        Param::ReverbLevel,
        Param::ReverbFeedback,
        Param::ReverbDamping,
        Param::ChorusLevel,
        Param::ChorusDepth,
        Param::ChorusSpeed,
        Param::StereoWidth,
        Param::GlobalVolume,
        Param::LimiterThreshold,
        Param::LimiterEnabled,
    ];

    /// Stable integer id used across the C ABI
    pub fn id(self) -> u32 {
        self as u32
    }

    pub fn from_id(id: u32) -> Option<Param> {
        Param::ALL.get(id as usize).copied()
    }

    /// Inclusive range values are clamped to
    pub fn range(self) -> (f32, f32) {
        match self {
            Param::ReverbFeedback => (0.0, 0.9),
            Param::ChorusSpeed => (0.0, 20.0),
            _ => (0.0, 1.0),
        }
    }

    /// Clamp `value` into range, mapping NaN to the lower bound
    pub fn clamp(self, value: f32) -> f32 {
        let (min, max) = self.range();
        if value.is_nan() {
            min
        } else {
            value.clamp(min, max)
        }
    }
}

/// Snapshot of every toggle and parameter
#[derive(Clone, Debug, PartialEq)]
pub struct EffectSettings {
    pub echo_enabled: bool,
    pub reverb_enabled: bool,
    pub chorus_enabled: bool,
    pub vibrato_enabled: bool,
    pub tremolo_enabled: bool,
    pub stereo_enabled: bool,

    pub reverb_level: f32,
    pub reverb_feedback: f32,
    pub reverb_damping: f32,
    pub chorus_level: f32,
    pub chorus_depth: f32,
    pub chorus_speed: f32,
    pub stereo_width: f32,
    pub global_volume: f32,
    pub limiter_threshold: f32,
    pub limiter_enabled: bool,
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self {
            echo_enabled: true,
            reverb_enabled: true,
            chorus_enabled: true,
            vibrato_enabled: true,
            tremolo_enabled: true,
            stereo_enabled: true,

            reverb_level: 0.5,
            reverb_feedback: 0.5,
            reverb_damping: 0.6,
            chorus_level: 0.5,
            chorus_depth: 0.7,
            chorus_speed: 3.0,
            stereo_width: 0.55,
            global_volume: 0.65,
            limiter_threshold: 0.98,
            limiter_enabled: true,
        }
    }
}

impl EffectSettings {
    /// Every stage switched off; parameters keep their defaults
    pub fn bypass() -> Self {
        let mut settings = Self::default();
        for toggle in Toggle::ALL {
            settings.set_enabled(toggle, false);
        }
        settings
    }

    /// Only `toggle` switched on
    pub fn only(toggle: Toggle) -> Self {
        let mut settings = Self::bypass();
        settings.set_enabled(toggle, true);
        settings
    }

    pub fn is_enabled(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::Echo => self.echo_enabled,
            Toggle::Reverb => self.reverb_enabled,
            Toggle::Chorus => self.chorus_enabled,
            Toggle::Vibrato => self.vibrato_enabled,
            Toggle::Tremolo => self.tremolo_enabled,
            Toggle::Stereo => self.stereo_enabled,
        }
    }

    pub fn set_enabled(&mut self, toggle: Toggle, enabled: bool) {
        let slot = match toggle {
            Toggle::Echo => &mut self.echo_enabled,
            Toggle::Reverb => &mut self.reverb_enabled,
            Toggle::Chorus => &mut self.chorus_enabled,
            Toggle::Vibrato => &mut self.vibrato_enabled,
            Toggle::Tremolo => &mut self.tremolo_enabled,
            Toggle::Stereo => &mut self.stereo_enabled,
        };
        *slot = enabled;
    }

    pub fn param(&self, param: Param) -> f32 {
        match param {
            Param::ReverbLevel => self.reverb_level,
            Param::ReverbFeedback => self.reverb_feedback,
            Param::ReverbDamping => self.reverb_damping,
            Param::ChorusLevel => self.chorus_level,
            Param::ChorusDepth => self.chorus_depth,
            Param::ChorusSpeed => self.chorus_speed,
            Param::StereoWidth => self.stereo_width,
            Param::GlobalVolume => self.global_volume,
            Param::LimiterThreshold => self.limiter_threshold,
            Param::LimiterEnabled => {
                if self.limiter_enabled {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// Set a parameter, clamping it into range
    pub fn set_param(&mut self, param: Param, value: f32) {
        let value = param.clamp(value);
        match param {
            Param::ReverbLevel => self.reverb_level = value,
            Param::ReverbFeedback => self.reverb_feedback = value,
            Param::ReverbDamping => self.reverb_damping = value,
            Param::ChorusLevel => self.chorus_level = value,
            Param::ChorusDepth => self.chorus_depth = value,
            Param::ChorusSpeed => self.chorus_speed = value,
            Param::StereoWidth => self.stereo_width = value,
            Param::GlobalVolume => self.global_volume = value,
            Param::LimiterThreshold => self.limiter_threshold = value,
            Param::LimiterEnabled => self.limiter_enabled = value != 0.0,
        }
    }

    /// Copy of these settings with every parameter clamped into range
    pub fn clamped(&self) -> Self {
        let mut out = self.clone();
        for param in Param::ALL {
            let raw = self.param(param);
            out.set_param(param, raw);
            if out.param(param) != raw {
                log::warn!("{:?} {} out of range, clamped to {}", param, raw, out.param(param));
            }
        }
        out
    }
}

fn state(enabled: bool) -> &'static str {
    if enabled {
        "Enabled"
    } else {
        "Disabled"
    }
}

impl fmt::Display for EffectSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Effect Settings:")?;
        writeln!(f, "  Global Volume: {:.2}", self.global_volume)?;
        writeln!(f, "  Echo: {}", state(self.echo_enabled))?;
        writeln!(
            f,
            "  Reverb: {} (Level: {:.2}, Feedback: {:.2}, Damping: {:.2})",
            state(self.reverb_enabled),
            self.reverb_level,
            self.reverb_feedback,
            self.reverb_damping
        )?;
        writeln!(
            f,
            "  Chorus: {} (Level: {:.2}, Depth: {:.2}, Speed: {:.2} Hz)",
            state(self.chorus_enabled),
            self.chorus_level,
            self.chorus_depth,
            self.chorus_speed
        )?;
        writeln!(
            f,
            "  Stereo Widening: {} (Width: {:.2})",
            state(self.stereo_enabled),
            self.stereo_width
        )?;
        writeln!(f, "  Vibrato: {} (Depth: 3%, Speed: 3 Hz)", state(self.vibrato_enabled))?;
        write!(f, "  Tremolo: {} (Depth: 7.5%, Speed: 3 Hz)", state(self.tremolo_enabled))
    }
}

/// `f32` stored as its bit pattern for lock-free sharing
struct AtomicF32(AtomicU32);

impl AtomicF32 {
    fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

/// Shared control surface, written by the control path and read by the audio thread
///
/// Every field is an independent scalar with relaxed ordering; no field
/// depends on another being updated first.
pub struct EffectControls {
    toggles: [AtomicBool; 6],
    params: [AtomicF32; 10],
}

impl EffectControls {
    pub fn new(settings: &EffectSettings) -> Self {
        let settings = settings.clamped();
        Self {
            toggles: Toggle::ALL.map(|t| AtomicBool::new(settings.is_enabled(t))),
            params: Param::ALL.map(|p| AtomicF32::new(settings.param(p))),
        }
    }

    pub fn is_enabled(&self, toggle: Toggle) -> bool {
        self.toggles[toggle as usize].load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, toggle: Toggle, enabled: bool) {
        self.toggles[toggle as usize].store(enabled, Ordering::Relaxed);
    }

    /// Flip a toggle and return its new state
    pub fn toggle(&self, toggle: Toggle) -> bool {
        let enabled = !self.toggles[toggle as usize].fetch_xor(true, Ordering::Relaxed);
        log::info!("{}: {}", toggle, state(enabled));
        enabled
    }

    /// Flip the toggle bound to `key`, if any
    pub fn handle_key(&self, key: char) -> Option<(Toggle, bool)> {
        let toggle = Toggle::from_key(key)?;
        Some((toggle, self.toggle(toggle)))
    }

    pub fn param(&self, param: Param) -> f32 {
        self.params[param as usize].load()
    }

    /// Set a parameter, clamped into its range
    pub fn set_param(&self, param: Param, value: f32) {
        self.params[param as usize].store(param.clamp(value));
    }

    /// Read every toggle and parameter once
    pub fn snapshot(&self) -> EffectSettings {
        let mut settings = EffectSettings::default();
        for toggle in Toggle::ALL {
            settings.set_enabled(toggle, self.is_enabled(toggle));
        }
        for param in Param::ALL {
            settings.set_param(param, self.param(param));
        }
        settings
    }
}

impl Default for EffectControls {
    fn default() -> Self {
        Self::new(&EffectSettings::default())
    }
}
