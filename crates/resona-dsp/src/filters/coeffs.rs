// SPDX-License-Identifier: LGPL-3.0-or-later

//! Biquad coefficient designers from the RBJ Audio EQ Cookbook.
//!
//! All designers return a0-normalized coefficients in the standard
//! cookbook sign convention; the processing recurrence in
//! [`Biquad`](super::biquad::Biquad) subtracts the feedback terms.
//!
//! Inputs are assumed already clamped by the caller. If a design would
//! produce a non-finite coefficient it degenerates to
//! [`BiquadCoeffs::bypass`] instead, so a bad parameter combination can
//! never poison the signal path.

use std::f64::consts::{FRAC_1_SQRT_2, PI};

/// Filter shape of a single equalizer band.
///
/// The integer mapping (`0..=4` in declaration order) is part of the host
/// contract; unknown ids fall back to `Peaking`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterType {
    /// Peaking (bell/parametric) equalizer.
    #[default]
    Peaking,
    /// Second-order low-pass filter.
    Lowpass,
    /// Second-order high-pass filter.
    Highpass,
    /// Low-shelf equalizer.
    LowShelf,
    /// High-shelf equalizer.
    HighShelf,
}

impl FilterType {
    /// Map a host-supplied integer id to a filter type.
    ///
    /// Unknown ids map to `Peaking` (legacy fallback).
    pub fn from_id(id: i32) -> Self {
        match id {
            1 => Self::Lowpass,
            2 => Self::Highpass,
            3 => Self::LowShelf,
            4 => Self::HighShelf,
            _ => Self::Peaking,
        }
    }
}

/// Normalized biquad coefficients (`a0 == 1`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoeffs {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl Default for BiquadCoeffs {
    fn default() -> Self {
        Self::bypass()
    }
}

impl BiquadCoeffs {
    /// Identity (pass-through) coefficients.
    pub const fn bypass() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
        }
    }

    /// True if every coefficient is finite.
    pub fn is_finite(&self) -> bool {
        self.b0.is_finite()
            && self.b1.is_finite()
            && self.b2.is_finite()
            && self.a1.is_finite()
            && self.a2.is_finite()
    }
}

/// Design biquad coefficients for the given filter type.
///
/// `gain_db` is used by `Peaking`, `LowShelf`, and `HighShelf` only.
/// Returns [`BiquadCoeffs::bypass`] if any normalized coefficient would be
/// non-finite.
pub fn design(
    filter_type: FilterType,
    sample_rate: f64,
    freq: f64,
    gain_db: f64,
    q: f64,
) -> BiquadCoeffs {
    let w0 = 2.0 * PI * freq / sample_rate;
    let cos_w0 = w0.cos();
    let sin_w0 = w0.sin();
    let alpha = sin_w0 / (2.0 * q);

    // A is used only by the gain-bearing types
    let a_lin = 10.0_f64.powf(gain_db / 40.0);

    let (b0, b1, b2, a0, a1, a2) = match filter_type {
        FilterType::Peaking => {
            let b0 = 1.0 + alpha * a_lin;
            let b1 = -2.0 * cos_w0;
            let b2 = 1.0 - alpha * a_lin;
            let a0 = 1.0 + alpha / a_lin;
            let a2 = 1.0 - alpha / a_lin;
            (b0, b1, b2, a0, b1, a2)
        }

        FilterType::Lowpass => {
            let b1 = 1.0 - cos_w0;
            let b0 = b1 / 2.0;
            let a0 = 1.0 + alpha;
            (b0, b1, b0, a0, -2.0 * cos_w0, 1.0 - alpha)
        }

        FilterType::Highpass => {
            let b0 = (1.0 + cos_w0) / 2.0;
            let b1 = -(1.0 + cos_w0);
            let a0 = 1.0 + alpha;
            (b0, b1, b0, a0, -2.0 * cos_w0, 1.0 - alpha)
        }

        FilterType::LowShelf => {
            let two_sqrt_a_alpha = 2.0 * a_lin.sqrt() * alpha;
            let a_plus_1 = a_lin + 1.0;
            let a_minus_1 = a_lin - 1.0;

            let b0 = a_lin * (a_plus_1 - a_minus_1 * cos_w0 + two_sqrt_a_alpha);
            let b1 = 2.0 * a_lin * (a_minus_1 - a_plus_1 * cos_w0);
            let b2 = a_lin * (a_plus_1 - a_minus_1 * cos_w0 - two_sqrt_a_alpha);
            let a0 = a_plus_1 + a_minus_1 * cos_w0 + two_sqrt_a_alpha;
            let a1 = -2.0 * (a_minus_1 + a_plus_1 * cos_w0);
            let a2 = a_plus_1 + a_minus_1 * cos_w0 - two_sqrt_a_alpha;
            (b0, b1, b2, a0, a1, a2)
        }

        FilterType::HighShelf => {
            let two_sqrt_a_alpha = 2.0 * a_lin.sqrt() * alpha;
            let a_plus_1 = a_lin + 1.0;
            let a_minus_1 = a_lin - 1.0;

            let b0 = a_lin * (a_plus_1 + a_minus_1 * cos_w0 + two_sqrt_a_alpha);
            let b1 = -2.0 * a_lin * (a_minus_1 + a_plus_1 * cos_w0);
            let b2 = a_lin * (a_plus_1 + a_minus_1 * cos_w0 - two_sqrt_a_alpha);
            let a0 = a_plus_1 - a_minus_1 * cos_w0 + two_sqrt_a_alpha;
            let a1 = 2.0 * (a_minus_1 - a_plus_1 * cos_w0);
            let a2 = a_plus_1 - a_minus_1 * cos_w0 - two_sqrt_a_alpha;
            (b0, b1, b2, a0, a1, a2)
        }
    };

    let inv_a0 = 1.0 / a0;
    let coeffs = BiquadCoeffs {
        b0: b0 * inv_a0,
        b1: b1 * inv_a0,
        b2: b2 * inv_a0,
        a1: a1 * inv_a0,
        a2: a2 * inv_a0,
    };

    if coeffs.is_finite() {
        coeffs
    } else {
        BiquadCoeffs::bypass()
    }
}

/// Butterworth low-pass section (fixed `Q = 1/sqrt(2)`), for crossover use.
pub fn butterworth_lowpass(sample_rate: f64, freq: f64) -> BiquadCoeffs {
    design(FilterType::Lowpass, sample_rate, freq, 0.0, FRAC_1_SQRT_2)
}

/// Butterworth high-pass section (fixed `Q = 1/sqrt(2)`), for crossover use.
pub fn butterworth_highpass(sample_rate: f64, freq: f64) -> BiquadCoeffs {
    design(FilterType::Highpass, sample_rate, freq, 0.0, FRAC_1_SQRT_2)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f64 = 48000.0;

    fn assert_finite(c: &BiquadCoeffs, label: &str) {
        assert!(c.is_finite(), "{label}: non-finite coefficients: {c:?}");
    }

    /// DC gain `H(z=1) = (b0 + b1 + b2) / (1 + a1 + a2)`.
    fn dc_gain(c: &BiquadCoeffs) -> f64 {
        (c.b0 + c.b1 + c.b2) / (1.0 + c.a1 + c.a2)
    }

    /// Nyquist gain `H(z=-1) = (b0 - b1 + b2) / (1 - a1 + a2)`.
    fn nyquist_gain(c: &BiquadCoeffs) -> f64 {
        (c.b0 - c.b1 + c.b2) / (1.0 - c.a1 + c.a2)
    }

    /// Magnitude of `H(e^{jw})` at angular frequency `w`.
    fn mag_at_w(c: &BiquadCoeffs, w: f64) -> f64 {
        let (cos_w, sin_w) = (w.cos(), w.sin());
        let (cos_2w, sin_2w) = ((2.0 * w).cos(), (2.0 * w).sin());

        let num_re = c.b0 + c.b1 * cos_w + c.b2 * cos_2w;
        let num_im = -c.b1 * sin_w - c.b2 * sin_2w;
        let den_re = 1.0 + c.a1 * cos_w + c.a2 * cos_2w;
        let den_im = -c.a1 * sin_w - c.a2 * sin_2w;

        ((num_re * num_re + num_im * num_im) / (den_re * den_re + den_im * den_im)).sqrt()
    }

    #[test]
    fn from_id_maps_known_and_unknown() {
        assert_eq!(FilterType::from_id(0), FilterType::Peaking);
        assert_eq!(FilterType::from_id(1), FilterType::Lowpass);
        assert_eq!(FilterType::from_id(2), FilterType::Highpass);
        assert_eq!(FilterType::from_id(3), FilterType::LowShelf);
        assert_eq!(FilterType::from_id(4), FilterType::HighShelf);
        // Unknown ids fall back to Peaking
        assert_eq!(FilterType::from_id(-1), FilterType::Peaking);
        assert_eq!(FilterType::from_id(5), FilterType::Peaking);
        assert_eq!(FilterType::from_id(1000), FilterType::Peaking);
    }

    #[test]
    fn bypass_is_identity() {
        let c = BiquadCoeffs::bypass();
        assert_eq!(dc_gain(&c), 1.0);
        assert_eq!(nyquist_gain(&c), 1.0);
    }

    #[test]
    fn peaking_gain_at_center() {
        for &gain_db in &[-24.0, -6.0, 3.0, 6.0, 24.0] {
            let c = design(FilterType::Peaking, SR, 2000.0, gain_db, 1.0);
            let w0 = 2.0 * std::f64::consts::PI * 2000.0 / SR;
            let mag = mag_at_w(&c, w0);
            let expected = 10.0_f64.powf(gain_db / 20.0);
            assert!(
                (mag - expected).abs() < expected * 0.01,
                "Peaking at {gain_db} dB center gain: expected {expected}, got {mag}"
            );
        }
    }

    #[test]
    fn peaking_zero_gain_is_transparent() {
        let c = design(FilterType::Peaking, SR, 1000.0, 0.0, 1.0);
        for &freq in &[10.0, 100.0, 1000.0, 10000.0, 20000.0] {
            let w = 2.0 * std::f64::consts::PI * freq / SR;
            let mag = mag_at_w(&c, w);
            assert!(
                (mag - 1.0).abs() < 1e-9,
                "0 dB peaking should be unity at {freq} Hz, got {mag}"
            );
        }
    }

    #[test]
    fn lowpass_dc_and_nyquist() {
        let c = design(FilterType::Lowpass, SR, 1000.0, 0.0, FRAC_1_SQRT_2);
        assert!((dc_gain(&c) - 1.0).abs() < 1e-9, "LPF DC gain should be 1");
        assert!(
            nyquist_gain(&c).abs() < 1e-9,
            "LPF Nyquist gain should be ~0"
        );
    }

    #[test]
    fn highpass_dc_and_nyquist() {
        let c = design(FilterType::Highpass, SR, 1000.0, 0.0, FRAC_1_SQRT_2);
        assert!(dc_gain(&c).abs() < 1e-9, "HPF DC gain should be ~0");
        assert!(
            (nyquist_gain(&c) - 1.0).abs() < 1e-9,
            "HPF Nyquist gain should be ~1"
        );
    }

    #[test]
    fn butterworth_cutoff_is_minus_3db() {
        let fc = 1000.0;
        let w0 = 2.0 * std::f64::consts::PI * fc / SR;
        let lp = butterworth_lowpass(SR, fc);
        let hp = butterworth_highpass(SR, fc);
        assert!((mag_at_w(&lp, w0) - FRAC_1_SQRT_2).abs() < 1e-3);
        assert!((mag_at_w(&hp, w0) - FRAC_1_SQRT_2).abs() < 1e-3);
    }

    #[test]
    fn butterworth_power_complementary() {
        // |LP|^2 + |HP|^2 == 1 at every frequency for 2nd-order Butterworth
        let fc = 4000.0;
        let lp = butterworth_lowpass(SR, fc);
        let hp = butterworth_highpass(SR, fc);
        for &freq in &[100.0, 1000.0, 4000.0, 10000.0, 20000.0] {
            let w = 2.0 * std::f64::consts::PI * freq / SR;
            let p = mag_at_w(&lp, w).powi(2) + mag_at_w(&hp, w).powi(2);
            assert!(
                (p - 1.0).abs() < 1e-6,
                "power sum at {freq} Hz should be 1, got {p}"
            );
        }
    }

    #[test]
    fn low_shelf_dc_gain_matches() {
        for &gain_db in &[-24.0, -6.0, 6.0, 24.0] {
            let c = design(FilterType::LowShelf, SR, 1000.0, gain_db, FRAC_1_SQRT_2);
            let expected = 10.0_f64.powf(gain_db / 20.0);
            let g = dc_gain(&c);
            assert!(
                (g - expected).abs() < expected * 0.01,
                "LowShelf DC gain at {gain_db} dB: expected {expected}, got {g}"
            );
        }
    }

    #[test]
    fn high_shelf_nyquist_gain_matches() {
        for &gain_db in &[-24.0, -6.0, 6.0, 24.0] {
            let c = design(FilterType::HighShelf, SR, 1000.0, gain_db, FRAC_1_SQRT_2);
            let expected = 10.0_f64.powf(gain_db / 20.0);
            let g = nyquist_gain(&c);
            assert!(
                (g - expected).abs() < expected * 0.01,
                "HighShelf Nyquist gain at {gain_db} dB: expected {expected}, got {g}"
            );
        }
    }

    #[test]
    fn extreme_clamped_ranges_stay_finite() {
        // Corners of the legal parameter box
        let types = [
            FilterType::Peaking,
            FilterType::Lowpass,
            FilterType::Highpass,
            FilterType::LowShelf,
            FilterType::HighShelf,
        ];
        for &ft in &types {
            for &freq in &[20.0, 20000.0] {
                for &q in &[0.1, 30.0] {
                    for &gain in &[-24.0, 24.0] {
                        let c = design(ft, 44100.0, freq, gain, q);
                        assert_finite(&c, &format!("{ft:?} f={freq} q={q} g={gain}"));
                    }
                }
            }
        }
    }

    #[test]
    fn degenerate_design_becomes_bypass() {
        // Zero Q divides by zero inside alpha; design must degrade to bypass
        let c = design(FilterType::Peaking, SR, 1000.0, 6.0, 0.0);
        assert_eq!(c, BiquadCoeffs::bypass());
    }
}
