//! Real-time post-processing effect chain for interleaved 16-bit stereo PCM
//!
//! The [`Engine`] takes each block handed out by an audio callback and runs it
//! through volume, echo, reverb, chorus, vibrato, tremolo and stereo widening,
//! then rescales the whole block if it left the 16-bit range.

pub mod config;
pub mod control;
pub mod effects;
pub mod engine;
pub mod ffi;
pub mod gen;
pub mod utils;

// Platform abstraction layer
pub mod platform;

// Offline rendering of WAV files
#[cfg(feature = "bounce")]
pub mod bounce;

pub use config::EngineConfig;
pub use control::{EffectControls, EffectSettings, Param, Toggle};
pub use engine::{BlockReport, Engine, StreamSummary};
