// SPDX-License-Identifier: LGPL-3.0-or-later

//! 16-band parametric equalizer with adaptive preset selection.
//!
//! The equalizer chains sixteen double-precision biquads, feeds a rolling
//! 512-sample analysis window, and smooths preset changes with a
//! raised-cosine parameter ramp. During a transition the band parameters
//! advance every sample while the trigonometric coefficient redesign runs
//! only every eighth sample, which keeps the ramp inaudible without paying
//! the full redesign cost per sample.

pub mod analysis;
pub mod band;
pub mod preset;

use crate::clip::ClipMode;
use crate::filters::coeffs::{self, FilterType};
use crate::filters::Biquad;

use self::analysis::{AnalysisRing, AudioAnalysis};
use self::band::BandParams;
use self::preset::CompactPreset;

/// Number of equalizer bands.
pub const NUM_BANDS: usize = 16;

/// Default preset transition length in samples.
pub const DEFAULT_TRANSITION_SAMPLES: u32 = 1024;

/// Coefficients are redesigned once per this many samples during a
/// transition; the parameter ramp itself advances every sample.
const COEFF_UPDATE_INTERVAL: u32 = 8;

const DEFAULT_SAMPLE_RATE: f64 = 44100.0;

/// 16-band parametric equalizer.
///
/// Mono, in-place processing. Setters run on the host control thread
/// between blocks; the processor itself performs no synchronization.
///
/// # Examples
///
/// ```
/// use resona_dsp::eq::Equalizer;
/// use resona_dsp::filters::FilterType;
///
/// let mut eq = Equalizer::new(48000.0);
/// eq.set_band(0, 80.0, 4.0, 0.7, FilterType::LowShelf);
/// eq.set_band(1, 3000.0, -2.5, 1.4, FilterType::Peaking);
///
/// let mut buf = [0.0f32; 256];
/// eq.process(&mut buf);
/// ```
pub struct Equalizer {
    sample_rate: f64,
    filters: [Biquad; NUM_BANDS],
    band_types: [FilterType; NUM_BANDS],
    bands: [BandParams; NUM_BANDS],

    // Transition state
    start_bands: [BandParams; NUM_BANDS],
    target_bands: [BandParams; NUM_BANDS],
    needs_update: [bool; NUM_BANDS],
    transitioning: bool,
    transition_progress: u32,
    transition_duration: u32,
    coeff_update_counter: u32,

    // Analysis
    ring: AnalysisRing,
    analysis: AudioAnalysis,

    // Presets
    presets: Vec<CompactPreset>,
    active_preset: Option<usize>,

    clip_mode: ClipMode,
}

impl Equalizer {
    /// Create an equalizer for the given sample rate.
    ///
    /// Non-positive rates fall back to 44100 Hz. All bands start flat
    /// (Peaking, 1 kHz, 0 dB, Q 1), which is an exact pass-through.
    pub fn new(sample_rate: f64) -> Self {
        let sample_rate = if sample_rate > 0.0 {
            sample_rate
        } else {
            DEFAULT_SAMPLE_RATE
        };

        let mut eq = Self {
            sample_rate,
            filters: std::array::from_fn(|_| Biquad::new()),
            band_types: [FilterType::Peaking; NUM_BANDS],
            bands: [BandParams::default(); NUM_BANDS],
            start_bands: [BandParams::default(); NUM_BANDS],
            target_bands: [BandParams::default(); NUM_BANDS],
            needs_update: [false; NUM_BANDS],
            transitioning: false,
            transition_progress: 0,
            transition_duration: DEFAULT_TRANSITION_SAMPLES,
            coeff_update_counter: 0,
            ring: AnalysisRing::new(),
            analysis: AudioAnalysis::default(),
            presets: Vec::new(),
            active_preset: None,
            clip_mode: ClipMode::default(),
        };
        for i in 0..NUM_BANDS {
            eq.redesign(i);
        }
        eq
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Configure one band immediately.
    ///
    /// Inputs are clamped into their legal ranges, the band's coefficients
    /// are redesigned at once, and any active preset is forgotten. An
    /// out-of-range index is a no-op. If the band was part of a running
    /// transition it is removed from it; the manual value wins.
    pub fn set_band(
        &mut self,
        index: usize,
        freq: f32,
        gain_db: f32,
        q: f32,
        filter_type: FilterType,
    ) {
        if index >= NUM_BANDS {
            return;
        }
        self.bands[index] = BandParams::clamped(freq, gain_db, q);
        self.band_types[index] = filter_type;
        self.needs_update[index] = false;
        self.redesign(index);
        self.active_preset = None;
    }

    /// Parameters of one band, if the index is valid.
    pub fn band_params(&self, index: usize) -> Option<BandParams> {
        self.bands.get(index).copied()
    }

    /// Filter type of one band, if the index is valid.
    pub fn band_filter_type(&self, index: usize) -> Option<FilterType> {
        self.band_types.get(index).copied()
    }

    /// Replace the preset table.
    ///
    /// Band parameters are clamped on the way in, so a malformed table can
    /// never introduce out-of-range live values later. The active preset
    /// index refers into the old table and is cleared.
    pub fn load_presets(&mut self, presets: &[CompactPreset]) {
        self.presets = presets
            .iter()
            .map(|p| {
                let mut p = p.clone();
                p.name = preset::sanitize_name(&p.name);
                for band in &mut p.bands {
                    *band = BandParams::clamped(band.freq, band.gain, band.q);
                }
                p
            })
            .collect();
        self.active_preset = None;
    }

    /// Number of loaded presets.
    pub fn preset_count(&self) -> usize {
        self.presets.len()
    }

    /// The loaded presets.
    pub fn presets(&self) -> &[CompactPreset] {
        &self.presets
    }

    /// Index of the preset applied last, if any.
    pub fn active_preset(&self) -> Option<usize> {
        self.active_preset
    }

    /// True while a preset transition is still ramping.
    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    /// Set the transition length in samples (minimum 1).
    pub fn set_transition_duration(&mut self, samples: u32) {
        self.transition_duration = samples.max(1);
    }

    /// Select the safety limiter form.
    pub fn set_clip_mode(&mut self, mode: ClipMode) {
        self.clip_mode = mode;
    }

    /// Current safety limiter form.
    pub fn clip_mode(&self) -> ClipMode {
        self.clip_mode
    }

    /// Apply a preset by index. An out-of-range index is a no-op.
    ///
    /// With `transition` set and a preset already active, the live
    /// parameters ramp to the preset over the transition duration;
    /// otherwise the preset is applied instantly.
    pub fn apply_preset(&mut self, index: usize, transition: bool) {
        let Some(preset) = self.presets.get(index) else {
            return;
        };
        let target = preset.bands;

        if transition && self.active_preset.is_some() {
            self.start_bands = self.bands;
            self.target_bands = target;
            self.needs_update = [true; NUM_BANDS];
            self.transition_progress = 0;
            self.coeff_update_counter = 0;
            self.transitioning = true;
        } else {
            self.bands = target;
            self.needs_update = [false; NUM_BANDS];
            self.transitioning = false;
            self.transition_progress = 0;
            for i in 0..NUM_BANDS {
                self.redesign(i);
            }
        }
        self.active_preset = Some(index);
    }

    /// Index of the preset scoring highest against the current analysis.
    ///
    /// Returns `None` when the table is empty. Ties keep the first
    /// maximum.
    pub fn select_adaptive_preset(&self) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, preset) in self.presets.iter().enumerate() {
            let score = preset.suitability(&self.analysis);
            match best {
                Some((_, s)) if score <= s => {}
                _ => best = Some((i, score)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Scale every band's gain by `factor`, clamping into range.
    ///
    /// Clears the active preset. Non-finite factors are ignored.
    pub fn apply_relative_gain(&mut self, factor: f32) {
        if !factor.is_finite() {
            return;
        }
        for i in 0..NUM_BANDS {
            let p = self.bands[i];
            self.bands[i] = BandParams::clamped(p.freq, p.gain * factor, p.q);
            self.redesign(i);
        }
        self.active_preset = None;
    }

    /// Analysis of the last completed 512-sample window.
    ///
    /// The reference stays valid (and at a stable address inside the
    /// processor) for the processor's lifetime; values change once per
    /// window.
    pub fn analysis(&self) -> &AudioAnalysis {
        &self.analysis
    }

    /// Process a mono buffer in place.
    pub fn process(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            if let Some(a) = self.ring.push(*sample) {
                self.analysis = a;
            }

            if self.transitioning {
                self.advance_transition();
            }

            let mut s = *sample as f64;
            for filter in self.filters.iter_mut() {
                s = filter.process(s);
            }
            *sample = self.clip_mode.apply(s) as f32;
        }
    }

    /// Redesign band `index` from its stored parameters.
    ///
    /// A degenerate design comes back as bypass; stale state is cleared
    /// with it so the band cannot ring on.
    fn redesign(&mut self, index: usize) {
        let p = self.bands[index];
        let c = coeffs::design(
            self.band_types[index],
            self.sample_rate,
            p.freq as f64,
            p.gain as f64,
            p.q as f64,
        );
        if c == coeffs::BiquadCoeffs::bypass() {
            self.filters[index].reset();
        }
        self.filters[index].set_coeffs(c);
    }

    /// Advance the transition by one sample.
    fn advance_transition(&mut self) {
        self.transition_progress += 1;

        if self.transition_progress >= self.transition_duration {
            // Land exactly on the target
            self.transition_progress = self.transition_duration;
            for i in 0..NUM_BANDS {
                if self.needs_update[i] {
                    self.bands[i] = self.target_bands[i];
                    self.redesign(i);
                    self.needs_update[i] = false;
                }
            }
            self.transitioning = false;
            self.coeff_update_counter = 0;
            return;
        }

        let p = self.transition_progress as f32 / self.transition_duration as f32;
        let eased = 0.5 * (1.0 - (std::f32::consts::PI * p).cos());
        for i in 0..NUM_BANDS {
            if self.needs_update[i] {
                self.bands[i] =
                    BandParams::lerp(&self.start_bands[i], &self.target_bands[i], eased);
            }
        }

        self.coeff_update_counter += 1;
        if self.coeff_update_counter >= COEFF_UPDATE_INTERVAL {
            self.coeff_update_counter = 0;
            for i in 0..NUM_BANDS {
                if self.needs_update[i] {
                    self.redesign(i);
                }
            }
        }
    }
}
