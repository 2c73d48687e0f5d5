//! C FFI bindings for the echofx engine
//!
//! This module exposes the effect chain to C mixers via C-compatible functions.
//! The engine is meant to be registered as a post-mix callback: the mixer
//! hands it each finished block of interleaved 16-bit stereo samples and plays
//! whatever the engine leaves in the buffer.

use crate::config::EngineConfig;
use crate::control::{EffectControls, Param, Toggle};
use crate::engine::Engine;
use std::ffi::c_void;
use std::os::raw::c_int;
use std::slice;
use std::sync::Arc;

/// Opaque wrapper around the engine for FFI
pub struct EchoFxEngine {
    engine: Engine,
    controls: Arc<EffectControls>,
}

// =============================================================================
// Toggle ids (must match the C header)
// =============================================================================

pub const ECHOFX_TOGGLE_ECHO: u32 = 0;
pub const ECHOFX_TOGGLE_REVERB: u32 = 1;
pub const ECHOFX_TOGGLE_CHORUS: u32 = 2;
pub const ECHOFX_TOGGLE_VIBRATO: u32 = 3;
pub const ECHOFX_TOGGLE_TREMOLO: u32 = 4;
pub const ECHOFX_TOGGLE_STEREO: u32 = 5;

// =============================================================================
// Parameter ids (must match the C header)
// =============================================================================

/// Reverb level (0-1)
pub const ECHOFX_PARAM_REVERB_LEVEL: u32 = 0;
/// Reverb feedback (0-0.9)
pub const ECHOFX_PARAM_REVERB_FEEDBACK: u32 = 1;
/// Reverb damping (0-1)
pub const ECHOFX_PARAM_REVERB_DAMPING: u32 = 2;
/// Chorus level (0-1)
pub const ECHOFX_PARAM_CHORUS_LEVEL: u32 = 3;
/// Chorus depth (0-1)
pub const ECHOFX_PARAM_CHORUS_DEPTH: u32 = 4;
/// Chorus speed (0-20 Hz)
pub const ECHOFX_PARAM_CHORUS_SPEED: u32 = 5;
/// Stereo width (0-1)
pub const ECHOFX_PARAM_STEREO_WIDTH: u32 = 6;
/// Global volume (0-1)
pub const ECHOFX_PARAM_GLOBAL_VOLUME: u32 = 7;
/// Limiter threshold (0-1)
pub const ECHOFX_PARAM_LIMITER_THRESHOLD: u32 = 8;
/// Limiter enabled (0 = off, anything else = on)
pub const ECHOFX_PARAM_LIMITER_ENABLED: u32 = 9;

// =============================================================================
// Engine lifecycle
// =============================================================================

/// Create a new engine with default settings
///
/// # Arguments
/// * `sample_rate` - Audio sample rate (e.g., 44100 or 48000)
/// * `block_frames` - Expected frames per callback (e.g., 1024)
///
/// # Returns
/// Pointer to a new EchoFxEngine, or null if the configuration is rejected.
/// Must be freed with `echofx_engine_free`.
#[no_mangle]
pub extern "C" fn echofx_engine_new(sample_rate: u32, block_frames: u32) -> *mut EchoFxEngine {
    let config = EngineConfig::new(sample_rate).with_block_frames(block_frames as usize);
    match Engine::new(config) {
        Ok(engine) => {
            let controls = engine.controls();
            Box::into_raw(Box::new(EchoFxEngine { engine, controls }))
        }
        Err(err) => {
            log::error!("Failed to create engine: {}", err);
            std::ptr::null_mut()
        }
    }
}

/// Free an engine
///
/// # Safety
/// `engine` must be a valid pointer returned by `echofx_engine_new`, or null.
/// After calling this function, the pointer is invalid and must not be used.
#[no_mangle]
pub unsafe extern "C" fn echofx_engine_free(engine: *mut EchoFxEngine) {
    if !engine.is_null() {
        drop(Box::from_raw(engine));
    }
}

// =============================================================================
// Audio processing
// =============================================================================

/// Process a block of interleaved 16-bit stereo samples in place
///
/// # Arguments
/// * `engine` - Pointer to an EchoFxEngine
/// * `buffer` - Interleaved L/R samples
/// * `samples` - Number of samples in `buffer` (twice the frame count)
///
/// # Safety
/// - `engine` must be a valid pointer returned by `echofx_engine_new`
/// - `buffer` must point to at least `samples` writable i16 values
#[no_mangle]
pub unsafe extern "C" fn echofx_engine_process(
    engine: *mut EchoFxEngine,
    buffer: *mut i16,
    samples: u32,
) {
    if engine.is_null() || buffer.is_null() {
        return;
    }

    let engine = &mut *engine;
    let buffer = slice::from_raw_parts_mut(buffer, samples as usize);
    engine.engine.process_block(buffer);
}

/// Post-mix callback with the `(udata, stream, len)` shape C mixers expect
///
/// `udata` is the engine pointer and `len` is the block length in bytes.
///
/// # Safety
/// - `udata` must be a valid pointer returned by `echofx_engine_new`
/// - `stream` must point to `len` writable bytes holding aligned i16 samples
#[no_mangle]
pub unsafe extern "C" fn echofx_mix_callback(udata: *mut c_void, stream: *mut u8, len: c_int) {
    if stream.is_null() || len <= 0 {
        return;
    }
    if (stream as usize) % std::mem::align_of::<i16>() != 0 {
        log::warn!("Mix buffer is not aligned for 16-bit samples; block skipped");
        return;
    }
    let samples = len as usize / std::mem::size_of::<i16>();
    echofx_engine_process(udata as *mut EchoFxEngine, stream as *mut i16, samples as u32);
}

// =============================================================================
// Toggles and parameters
// =============================================================================

/// Enable or disable a stage (see ECHOFX_TOGGLE_* constants)
///
/// # Safety
/// `engine` must be a valid pointer returned by `echofx_engine_new`
#[no_mangle]
pub unsafe extern "C" fn echofx_engine_set_toggle(engine: *mut EchoFxEngine, toggle: u32, enabled: bool) {
    if let (Some(engine), Some(toggle)) = (engine.as_ref(), Toggle::from_id(toggle)) {
        engine.controls.set_enabled(toggle, enabled);
    }
}

/// Whether a stage is enabled; false for unknown ids
///
/// # Safety
/// `engine` must be a valid pointer returned by `echofx_engine_new`
#[no_mangle]
pub unsafe extern "C" fn echofx_engine_get_toggle(engine: *const EchoFxEngine, toggle: u32) -> bool {
    match (engine.as_ref(), Toggle::from_id(toggle)) {
        (Some(engine), Some(toggle)) => engine.controls.is_enabled(toggle),
        _ => false,
    }
}

/// Flip the stage bound to a hot key (E, R, C, V, T, S)
///
/// # Returns
/// 1 if the stage is now enabled, 0 if disabled, -1 if the key is not bound.
///
/// # Safety
/// `engine` must be a valid pointer returned by `echofx_engine_new`
#[no_mangle]
pub unsafe extern "C" fn echofx_engine_handle_key(engine: *mut EchoFxEngine, key: u8) -> i32 {
    let Some(engine) = engine.as_ref() else {
        return -1;
    };
    match engine.controls.handle_key(key as char) {
        Some((_, true)) => 1,
        Some((_, false)) => 0,
        None => -1,
    }
}

/// Set a parameter (see ECHOFX_PARAM_* constants); values are clamped to range
///
/// # Safety
/// `engine` must be a valid pointer returned by `echofx_engine_new`
#[no_mangle]
pub unsafe extern "C" fn echofx_engine_set_param(engine: *mut EchoFxEngine, param: u32, value: f32) {
    if let (Some(engine), Some(param)) = (engine.as_ref(), Param::from_id(param)) {
        engine.controls.set_param(param, value);
    }
}

/// Current value of a parameter; 0.0 for unknown ids
///
/// # Safety
/// `engine` must be a valid pointer returned by `echofx_engine_new`
#[no_mangle]
pub unsafe extern "C" fn echofx_engine_get_param(engine: *const EchoFxEngine, param: u32) -> f32 {
    match (engine.as_ref(), Param::from_id(param)) {
        (Some(engine), Some(param)) => engine.controls.param(param),
        _ => 0.0,
    }
}

/// Number of toggles
#[no_mangle]
pub extern "C" fn echofx_toggle_count() -> u32 {
    Toggle::ALL.len() as u32
}

/// Number of parameters
#[no_mangle]
pub extern "C" fn echofx_param_count() -> u32 {
    Param::ALL.len() as u32
}
