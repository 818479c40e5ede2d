// SPDX-License-Identifier: LGPL-3.0-or-later

//! Spatializer entry points.

use std::slice;

use resona_dsp::spatial::Spatializer;

/// Opaque spatializer handle.
pub struct ResonaSpatializer(Spatializer);

/// Create a spatializer instance for the given sample rate.
///
/// Non-positive rates fall back to 44100 Hz. The returned handle must be
/// released with [`destroy_spatializer`].
#[no_mangle]
pub extern "C" fn create_spatializer(sample_rate: f64) -> *mut ResonaSpatializer {
    Box::into_raw(Box::new(ResonaSpatializer(Spatializer::new(sample_rate))))
}

/// Destroy a spatializer created by [`create_spatializer`].
///
/// # Safety
///
/// `handle` must be a live pointer from [`create_spatializer`] and must
/// not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn destroy_spatializer(handle: *mut ResonaSpatializer) {
    drop(Box::from_raw(handle));
}

/// Set the stereo width (clamped to `>= 0`).
///
/// # Safety
///
/// `handle` must be a live pointer from [`create_spatializer`].
#[no_mangle]
pub unsafe extern "C" fn spatializer_set_width(handle: *mut ResonaSpatializer, width: f32) {
    (*handle).0.set_width(width);
}

/// Set the reverb decay (clamped to `[0, 1]`).
///
/// # Safety
///
/// `handle` must be a live pointer from [`create_spatializer`].
#[no_mangle]
pub unsafe extern "C" fn spatializer_set_decay(handle: *mut ResonaSpatializer, decay: f32) {
    (*handle).0.set_decay(decay);
}

/// Set the reverb damping (clamped to `[0, 1]`).
///
/// # Safety
///
/// `handle` must be a live pointer from [`create_spatializer`].
#[no_mangle]
pub unsafe extern "C" fn spatializer_set_damping(handle: *mut ResonaSpatializer, damping: f32) {
    (*handle).0.set_damping(damping);
}

/// Set the dry/wet mix (clamped to `[0, 1]`).
///
/// # Safety
///
/// `handle` must be a live pointer from [`create_spatializer`].
#[no_mangle]
pub unsafe extern "C" fn spatializer_set_mix(handle: *mut ResonaSpatializer, mix: f32) {
    (*handle).0.set_mix(mix);
}

/// Set the widener crossover frequency in Hz (clamped to `[50, 500]`).
///
/// # Safety
///
/// `handle` must be a live pointer from [`create_spatializer`].
#[no_mangle]
pub unsafe extern "C" fn spatializer_set_crossover_freq(handle: *mut ResonaSpatializer, freq: f32) {
    (*handle).0.set_crossover_freq(freq);
}

/// Set the width factor of the band below the crossover (clamped to
/// `[0, 1]`).
///
/// # Safety
///
/// `handle` must be a live pointer from [`create_spatializer`].
#[no_mangle]
pub unsafe extern "C" fn spatializer_set_low_width_factor(
    handle: *mut ResonaSpatializer,
    factor: f32,
) {
    (*handle).0.set_low_width_factor(factor);
}

/// Set the width factor of the band above the crossover (clamped to
/// `[0, 3]`).
///
/// # Safety
///
/// `handle` must be a live pointer from [`create_spatializer`].
#[no_mangle]
pub unsafe extern "C" fn spatializer_set_high_width_factor(
    handle: *mut ResonaSpatializer,
    factor: f32,
) {
    (*handle).0.set_high_width_factor(factor);
}

/// Process `num_frames` interleaved stereo frames in place.
///
/// # Safety
///
/// `handle` must be a live pointer from [`create_spatializer`]; `buffer`
/// must point to at least `2 * num_frames` floats.
#[no_mangle]
pub unsafe extern "C" fn spatializer_process_buffer(
    handle: *mut ResonaSpatializer,
    buffer: *mut f32,
    num_frames: i32,
) {
    if num_frames <= 0 || buffer.is_null() {
        return;
    }
    let sp = &mut (*handle).0;
    sp.process(slice::from_raw_parts_mut(buffer, num_frames as usize * 2));
}
