// SPDX-License-Identifier: LGPL-3.0-or-later

//! Compact equalizer presets and adaptive suitability scoring.
//!
//! A preset carries one [`BandParams`] per band plus a six-element weight
//! vector. The weight vector scores the preset against the current
//! [`AudioAnalysis`]: each analysis feature is clamped to `[0, 1]` and the
//! score is the weighted sum. Positive weights favor presets when a
//! feature is strong, negative weights penalize.

use once_cell::sync::Lazy;

use super::analysis::AudioAnalysis;
use super::band::BandParams;
use super::NUM_BANDS;

/// Longest preset name, excluding the terminator.
pub const MAX_NAME_LEN: usize = 31;

/// Signed feature weights for adaptive preset selection.
///
/// Order matches the analysis features: rms, peak, normalized centroid,
/// bass, mid, treble.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SuitabilityWeights {
    pub rms: f32,
    pub peak: f32,
    pub centroid: f32,
    pub bass: f32,
    pub mid: f32,
    pub treble: f32,
}

impl SuitabilityWeights {
    pub const fn new(rms: f32, peak: f32, centroid: f32, bass: f32, mid: f32, treble: f32) -> Self {
        Self {
            rms,
            peak,
            centroid,
            bass,
            mid,
            treble,
        }
    }
}

/// A named 16-band preset with adaptive-selection weights.
#[derive(Debug, Clone, Default)]
pub struct CompactPreset {
    /// Display name, at most [`MAX_NAME_LEN`] printable characters.
    pub name: String,
    /// Host-defined category tag; opaque to the engine.
    pub category: u8,
    /// Band parameters applied one-to-one to the equalizer bands.
    pub bands: [BandParams; NUM_BANDS],
    /// Weights for [`CompactPreset::suitability`].
    pub weights: SuitabilityWeights,
}

impl CompactPreset {
    /// Create a flat preset with the given name and category.
    ///
    /// The name is filtered to printable characters and truncated to
    /// [`MAX_NAME_LEN`].
    pub fn new(name: &str, category: u8) -> Self {
        Self {
            name: sanitize_name(name),
            category,
            bands: [BandParams::default(); NUM_BANDS],
            weights: SuitabilityWeights::default(),
        }
    }

    /// Score this preset against an analysis snapshot.
    ///
    /// Features are clamped to `[0, 1]`; the centroid is normalized by
    /// 4 kHz first.
    pub fn suitability(&self, analysis: &AudioAnalysis) -> f32 {
        let clamp01 = |x: f32| x.clamp(0.0, 1.0);
        let w = &self.weights;
        w.rms * clamp01(analysis.rms_level)
            + w.peak * clamp01(analysis.peak_level)
            + w.centroid * clamp01(analysis.spectral_centroid / 4000.0)
            + w.bass * clamp01(analysis.bass_energy)
            + w.mid * clamp01(analysis.mid_energy)
            + w.treble * clamp01(analysis.treble_energy)
    }
}

/// Filter a raw name down to printable characters, truncated to
/// [`MAX_NAME_LEN`].
pub fn sanitize_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .take(MAX_NAME_LEN)
        .collect()
}

/// Center frequencies of the factory presets, low band to high.
const FACTORY_FREQS: [f32; NUM_BANDS] = [
    25.0, 40.0, 63.0, 100.0, 160.0, 250.0, 400.0, 630.0, 1000.0, 1600.0, 2500.0, 4000.0, 6300.0,
    10000.0, 12500.0, 16000.0,
];

fn factory(
    name: &str,
    category: u8,
    gains: [f32; NUM_BANDS],
    weights: SuitabilityWeights,
) -> CompactPreset {
    let mut preset = CompactPreset::new(name, category);
    for (band, (&freq, &gain)) in preset
        .bands
        .iter_mut()
        .zip(FACTORY_FREQS.iter().zip(gains.iter()))
    {
        *band = BandParams::clamped(freq, gain, 1.0);
    }
    preset.weights = weights;
    preset
}

static FACTORY_PRESETS: Lazy<Vec<CompactPreset>> = Lazy::new(|| {
    vec![
        factory(
            "Flat",
            0,
            [0.0; NUM_BANDS],
            SuitabilityWeights::new(0.1, 0.0, 0.0, 0.0, 0.0, 0.0),
        ),
        factory(
            "Bass Boost",
            1,
            [
                6.0, 5.5, 5.0, 4.0, 3.0, 1.5, 0.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
            ],
            // Thin, bright material benefits from a low-end lift
            SuitabilityWeights::new(0.0, 0.0, 0.4, -0.6, 0.1, 0.4),
        ),
        factory(
            "Treble Boost",
            1,
            [
                0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.5, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 6.0, 6.0,
            ],
            // Dull, bass-heavy material benefits from an air lift
            SuitabilityWeights::new(0.0, 0.0, -0.4, 0.5, 0.1, -0.6),
        ),
        factory(
            "Vocal Clarity",
            2,
            [
                -2.0, -1.5, -1.0, 0.0, 0.5, 1.0, 2.0, 3.0, 4.0, 4.0, 3.0, 2.0, 1.0, 0.5, 0.0, 0.0,
            ],
            SuitabilityWeights::new(0.2, 0.0, 0.2, -0.2, 0.6, -0.1),
        ),
        factory(
            "Loudness",
            0,
            [
                5.0, 4.0, 3.0, 1.0, 0.0, -1.0, -1.0, -1.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 4.5, 5.0,
            ],
            // Quiet program material wants the equal-loudness contour
            SuitabilityWeights::new(-0.8, -0.2, 0.0, 0.1, 0.1, 0.1),
        ),
        factory(
            "Electronic",
            3,
            [
                4.5, 4.0, 3.0, 1.5, 0.0, -1.0, -2.0, -2.0, -1.0, 0.0, 0.5, 1.0, 2.0, 3.0, 4.0, 4.5,
            ],
            SuitabilityWeights::new(0.3, 0.3, 0.1, 0.3, -0.4, 0.3),
        ),
    ]
});

/// Factory preset table shipped with the engine.
///
/// Hosts that manage their own preset storage simply ignore this and call
/// `load_presets` with their own table.
pub fn builtin_presets() -> &'static [CompactPreset] {
    &FACTORY_PRESETS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eq::band::{FREQ_MAX, FREQ_MIN, GAIN_MAX, GAIN_MIN};

    #[test]
    fn name_is_sanitized() {
        let p = CompactPreset::new("My\tWeird\u{7f} Preset\nName!", 3);
        assert_eq!(p.name, "MyWeird PresetName!");
        assert_eq!(p.category, 3);
    }

    #[test]
    fn name_is_truncated() {
        let long = "x".repeat(80);
        let p = CompactPreset::new(&long, 0);
        assert_eq!(p.name.len(), MAX_NAME_LEN);
    }

    #[test]
    fn suitability_of_silence_is_zero_for_positive_weights() {
        let mut p = CompactPreset::new("test", 0);
        p.weights = SuitabilityWeights::new(1.0, 1.0, 1.0, 1.0, 1.0, 1.0);
        let a = AudioAnalysis::default();
        assert_eq!(p.suitability(&a), 0.0);
    }

    #[test]
    fn suitability_clamps_features() {
        let mut p = CompactPreset::new("test", 0);
        p.weights = SuitabilityWeights::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        let a = AudioAnalysis {
            rms_level: 50.0, // far above the clamp
            ..AudioAnalysis::default()
        };
        assert_eq!(p.suitability(&a), 1.0);
    }

    #[test]
    fn suitability_normalizes_centroid() {
        let mut p = CompactPreset::new("test", 0);
        p.weights = SuitabilityWeights::new(0.0, 0.0, 1.0, 0.0, 0.0, 0.0);
        let a = AudioAnalysis {
            spectral_centroid: 2000.0,
            ..AudioAnalysis::default()
        };
        assert_eq!(p.suitability(&a), 0.5);
    }

    #[test]
    fn negative_weights_subtract() {
        let mut p = CompactPreset::new("test", 0);
        p.weights = SuitabilityWeights::new(0.0, 0.0, 0.0, -1.0, 0.0, 0.5);
        let a = AudioAnalysis {
            bass_energy: 0.5,
            treble_energy: 0.4,
            ..AudioAnalysis::default()
        };
        assert!((p.suitability(&a) - (-0.5 + 0.2)).abs() < 1e-6);
    }

    #[test]
    fn factory_table_is_well_formed() {
        let presets = builtin_presets();
        assert!(!presets.is_empty());
        for p in presets {
            assert!(p.name.len() <= MAX_NAME_LEN);
            for band in &p.bands {
                assert!(band.freq >= FREQ_MIN && band.freq <= FREQ_MAX);
                assert!(band.gain >= GAIN_MIN && band.gain <= GAIN_MAX);
            }
        }
        assert_eq!(presets[0].name, "Flat");
    }
}
