// SPDX-License-Identifier: LGPL-3.0-or-later

//! Equalizer entry points.

use std::slice;

use resona_dsp::eq::analysis::AudioAnalysis;
use resona_dsp::eq::Equalizer;
use resona_dsp::filters::FilterType;

use crate::preset::CompactPresetC;

/// Opaque equalizer handle.
pub struct ResonaEqualizer(Equalizer);

/// Create an equalizer instance for the given sample rate.
///
/// Non-positive rates fall back to 44100 Hz. The returned handle must be
/// released with [`destroy_equalizer`].
#[no_mangle]
pub extern "C" fn create_equalizer(sample_rate: f64) -> *mut ResonaEqualizer {
    Box::into_raw(Box::new(ResonaEqualizer(Equalizer::new(sample_rate))))
}

/// Destroy an equalizer created by [`create_equalizer`].
///
/// # Safety
///
/// `handle` must be a live pointer from [`create_equalizer`] and must not
/// be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn destroy_equalizer(handle: *mut ResonaEqualizer) {
    drop(Box::from_raw(handle));
}

/// Configure one band immediately.
///
/// Out-of-range band indices are no-ops; parameter values are clamped;
/// unknown filter types fall back to Peaking. `filter_type` maps
/// `{0, 1, 2, 3, 4}` to `{Peaking, LowPass, HighPass, LowShelf,
/// HighShelf}`.
///
/// # Safety
///
/// `handle` must be a live pointer from [`create_equalizer`].
#[no_mangle]
pub unsafe extern "C" fn set_band(
    handle: *mut ResonaEqualizer,
    band_index: i32,
    frequency: f64,
    gain_db: f64,
    q: f64,
    filter_type: i32,
) {
    if band_index < 0 {
        return;
    }
    let eq = &mut (*handle).0;
    eq.set_band(
        band_index as usize,
        frequency as f32,
        gain_db as f32,
        q as f32,
        FilterType::from_id(filter_type),
    );
}

/// Replace the preset table from a packed array of [`CompactPresetC`].
///
/// A non-positive `count` clears the table; a null `presets` pointer with
/// a positive count leaves the table unchanged.
///
/// # Safety
///
/// `handle` must be a live pointer from [`create_equalizer`]. When
/// `count > 0` and `presets` is non-null it must point to `count`
/// consecutive [`CompactPresetC`] records.
#[no_mangle]
pub unsafe extern "C" fn equalizer_load_presets(
    handle: *mut ResonaEqualizer,
    presets: *const CompactPresetC,
    count: i32,
) {
    let eq = &mut (*handle).0;
    if count <= 0 {
        eq.load_presets(&[]);
        return;
    }
    if presets.is_null() {
        return;
    }
    let raw = slice::from_raw_parts(presets, count as usize);
    let table: Vec<_> = raw.iter().map(|p| p.to_core()).collect();
    eq.load_presets(&table);
}

/// Apply a preset by index, optionally with a smoothed transition.
///
/// Out-of-range indices are no-ops. `enable_transition` is a boolean flag
/// (`0` = instant).
///
/// # Safety
///
/// `handle` must be a live pointer from [`create_equalizer`].
#[no_mangle]
pub unsafe extern "C" fn equalizer_apply_preset(
    handle: *mut ResonaEqualizer,
    preset_index: i32,
    enable_transition: i32,
) {
    if preset_index < 0 {
        return;
    }
    let eq = &mut (*handle).0;
    eq.apply_preset(preset_index as usize, enable_transition != 0);
}

/// Index of the preset that best matches the current analysis, or `-1`
/// when the table is empty.
///
/// # Safety
///
/// `handle` must be a live pointer from [`create_equalizer`].
#[no_mangle]
pub unsafe extern "C" fn equalizer_select_adaptive_preset(handle: *mut ResonaEqualizer) -> i32 {
    let eq = &(*handle).0;
    eq.select_adaptive_preset().map_or(-1, |i| i as i32)
}

/// Multiply every band's gain by `factor`, clamped into range.
///
/// # Safety
///
/// `handle` must be a live pointer from [`create_equalizer`].
#[no_mangle]
pub unsafe extern "C" fn equalizer_apply_relative_gain(handle: *mut ResonaEqualizer, factor: f32) {
    (*handle).0.apply_relative_gain(factor);
}

/// Process `num_samples` mono samples in place.
///
/// # Safety
///
/// `handle` must be a live pointer from [`create_equalizer`]; `buffer`
/// must point to at least `num_samples` floats.
#[no_mangle]
pub unsafe extern "C" fn equalizer_process_buffer(
    handle: *mut ResonaEqualizer,
    buffer: *mut f32,
    num_samples: i32,
) {
    if num_samples <= 0 || buffer.is_null() {
        return;
    }
    let eq = &mut (*handle).0;
    eq.process(slice::from_raw_parts_mut(buffer, num_samples as usize));
}

/// Borrow the analysis of the last completed 512-sample window.
///
/// The pointer stays valid until the handle is destroyed; the values
/// behind it refresh once per window, so the host must treat reads as
/// advisory.
///
/// # Safety
///
/// `handle` must be a live pointer from [`create_equalizer`].
#[no_mangle]
pub unsafe extern "C" fn equalizer_get_analysis(handle: *mut ResonaEqualizer) -> *const AudioAnalysis {
    (*handle).0.analysis() as *const AudioAnalysis
}

/// Index of the preset applied last, or `-1` if none is active.
///
/// # Safety
///
/// `handle` must be a live pointer from [`create_equalizer`].
#[no_mangle]
pub unsafe extern "C" fn equalizer_get_active_preset(handle: *mut ResonaEqualizer) -> i32 {
    (*handle).0.active_preset().map_or(-1, |i| i as i32)
}
