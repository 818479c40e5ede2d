// SPDX-License-Identifier: LGPL-3.0-or-later

//! Stereo spatializer: frequency-dependent mid/side widener plus a 4×4
//! feedback delay network reverberator.
//!
//! Signal path per stereo frame:
//!
//! 1. Encode L/R into mid/side.
//! 2. Split mid and side into low and high bands with a 4th-order
//!    Linkwitz–Riley crossover (two cascaded Butterworth biquads per
//!    branch).
//! 3. Scale the side bands by `width * low_width_factor` and
//!    `width * high_width_factor`; when the two effective factors are
//!    equal the split contributes nothing but its phase rotation, so the
//!    widener takes the uniform `side * width` path and dry output stays
//!    sample-exact. The crossover filters keep running either way so
//!    engaging the banded path later is click-free.
//! 4. Decode back to L/R ("wide" signal).
//! 5. Feed the mono sum into four prime-length delay lines mixed through
//!    a Hadamard matrix with per-line one-pole damping.
//! 6. Mix wide and wet per the dry/wet `mix` parameter.
//!
//! Parameter changes apply immediately (no smoothing); spatializer
//! parameters move at UI cadence, not audio cadence.

use crate::filters::coeffs::{butterworth_highpass, butterworth_lowpass};
use crate::filters::Biquad;
use crate::util::DelayLine;

/// Number of delay lines in the feedback network.
pub const FDN_ORDER: usize = 4;

/// Lower bound of the crossover frequency in Hz.
pub const CROSSOVER_MIN: f32 = 50.0;
/// Upper bound of the crossover frequency in Hz.
pub const CROSSOVER_MAX: f32 = 500.0;
/// Upper bound of the high-band width factor.
pub const HIGH_WIDTH_MAX: f32 = 3.0;

/// Mutually prime base lengths; scaled so the longest line is one tenth
/// of a second. The 2221 divisor is part of the published behavior.
const BASE_PRIMES: [u32; FDN_ORDER] = [1553, 1871, 2083, 2221];

const HADAMARD: [[f32; FDN_ORDER]; FDN_ORDER] = [
    [1.0, 1.0, 1.0, 1.0],
    [1.0, -1.0, 1.0, -1.0],
    [1.0, 1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0, 1.0],
];

/// 1/sqrt(N) for N = 4.
const HADAMARD_NORM: f32 = 0.5;

const DEFAULT_SAMPLE_RATE: f64 = 44100.0;

/// Stereo widener and FDN reverberator.
///
/// Processes interleaved stereo in place. Like the equalizer, the
/// processor assumes single-threaded access; the host serializes setters
/// against the audio callback.
///
/// # Examples
///
/// ```
/// use resona_dsp::spatial::Spatializer;
///
/// let mut sp = Spatializer::new(48000.0);
/// sp.set_width(1.4);
/// sp.set_mix(0.2);
///
/// let mut frames = [0.0f32; 512]; // 256 stereo frames, interleaved
/// sp.process(&mut frames);
/// ```
pub struct Spatializer {
    sample_rate: f64,

    width: f32,
    decay: f32,
    damping: f32,
    mix: f32,
    crossover_freq: f32,
    low_width_factor: f32,
    high_width_factor: f32,

    // Crossover: two cascaded Butterworth sections per branch
    mid_lp: [Biquad; 2],
    mid_hp: [Biquad; 2],
    side_lp: [Biquad; 2],
    side_hp: [Biquad; 2],

    delay_lines: [DelayLine; FDN_ORDER],
    delay_lengths: [usize; FDN_ORDER],
    fdn_gains: [f32; FDN_ORDER],
    fdn_lp_z: [f32; FDN_ORDER],
}

impl Spatializer {
    /// Create a spatializer for the given sample rate.
    ///
    /// Non-positive rates fall back to 44100 Hz. Delay lines are sized
    /// `length + 2`, so every line has strictly positive capacity.
    pub fn new(sample_rate: f64) -> Self {
        let sample_rate = if sample_rate > 0.0 {
            sample_rate
        } else {
            DEFAULT_SAMPLE_RATE
        };

        let mut delay_lengths = [0usize; FDN_ORDER];
        let mut delay_lines: [DelayLine; FDN_ORDER] = Default::default();
        for i in 0..FDN_ORDER {
            let len = (BASE_PRIMES[i] as f64 / BASE_PRIMES[FDN_ORDER - 1] as f64
                * sample_rate
                * 0.1) as usize;
            delay_lengths[i] = len;
            delay_lines[i] = DelayLine::new(len + 2);
        }

        let mut sp = Self {
            sample_rate,
            width: 1.0,
            decay: 0.5,
            damping: 0.5,
            mix: 0.25,
            crossover_freq: 250.0,
            low_width_factor: 1.0,
            high_width_factor: 1.0,
            mid_lp: std::array::from_fn(|_| Biquad::new()),
            mid_hp: std::array::from_fn(|_| Biquad::new()),
            side_lp: std::array::from_fn(|_| Biquad::new()),
            side_hp: std::array::from_fn(|_| Biquad::new()),
            delay_lines,
            delay_lengths,
            fdn_gains: [0.0; FDN_ORDER],
            fdn_lp_z: [0.0; FDN_ORDER],
        };
        sp.update_gains();
        sp.configure_crossover();
        sp
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Stereo width. Clamped to `>= 0`; `1.0` is neutral.
    pub fn set_width(&mut self, width: f32) {
        self.width = width.max(0.0);
    }

    /// Reverb decay in `[0, 1]`. Recomputes the feedback gains.
    pub fn set_decay(&mut self, decay: f32) {
        self.decay = decay.clamp(0.0, 1.0);
        self.update_gains();
    }

    /// High-frequency damping of the reverb tail, in `[0, 1]`.
    pub fn set_damping(&mut self, damping: f32) {
        self.damping = damping.clamp(0.0, 1.0);
    }

    /// Dry/wet mix in `[0, 1]`; `0` is fully dry.
    pub fn set_mix(&mut self, mix: f32) {
        self.mix = mix.clamp(0.0, 1.0);
    }

    /// Crossover frequency in Hz, clamped to `[50, 500]`. Redesigns all
    /// eight crossover sections.
    pub fn set_crossover_freq(&mut self, freq: f32) {
        self.crossover_freq = freq.clamp(CROSSOVER_MIN, CROSSOVER_MAX);
        self.configure_crossover();
    }

    /// Width multiplier for the band below the crossover, in `[0, 1]`.
    pub fn set_low_width_factor(&mut self, factor: f32) {
        self.low_width_factor = factor.clamp(0.0, 1.0);
    }

    /// Width multiplier for the band above the crossover, in `[0, 3]`.
    pub fn set_high_width_factor(&mut self, factor: f32) {
        self.high_width_factor = factor.clamp(0.0, HIGH_WIDTH_MAX);
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn decay(&self) -> f32 {
        self.decay
    }

    pub fn damping(&self) -> f32 {
        self.damping
    }

    pub fn mix(&self) -> f32 {
        self.mix
    }

    pub fn crossover_freq(&self) -> f32 {
        self.crossover_freq
    }

    pub fn low_width_factor(&self) -> f32 {
        self.low_width_factor
    }

    pub fn high_width_factor(&self) -> f32 {
        self.high_width_factor
    }

    /// Delay line lengths in samples, shortest to longest.
    pub fn delay_lengths(&self) -> [usize; FDN_ORDER] {
        self.delay_lengths
    }

    /// Process an interleaved stereo buffer in place.
    ///
    /// `buffer.len() / 2` frames are processed; a trailing odd sample is
    /// left untouched.
    pub fn process(&mut self, buffer: &mut [f32]) {
        let wl = (self.width * self.low_width_factor) as f64;
        let wh = (self.width * self.high_width_factor) as f64;
        let uniform = (wl - wh).abs() <= f64::EPSILON;
        let mix = self.mix as f64;
        let damping = self.damping;

        for frame in buffer.chunks_exact_mut(2) {
            let dry_l = frame[0] as f64;
            let dry_r = frame[1] as f64;

            let mid = (dry_l + dry_r) * 0.5;
            let side = (dry_l - dry_r) * 0.5;

            // The split runs every frame to keep filter state continuous
            let mid_low_stage0 = self.mid_lp[0].process(mid);
            let mid_low = self.mid_lp[1].process(mid_low_stage0);
            let mid_high_stage0 = self.mid_hp[0].process(mid);
            let mid_high = self.mid_hp[1].process(mid_high_stage0);
            let side_low_stage0 = self.side_lp[0].process(side);
            let side_low = self.side_lp[1].process(side_low_stage0);
            let side_high_stage0 = self.side_hp[0].process(side);
            let side_high = self.side_hp[1].process(side_high_stage0);

            let (mid_out, side_out) = if uniform {
                (mid, side * wl)
            } else {
                (mid_low + mid_high, side_low * wl + side_high * wh)
            };

            let wide_l = mid_out + side_out;
            let wide_r = mid_out - side_out;

            // FDN: mono sum in, stereo taps out
            let fdn_input = ((wide_l + wide_r) * 0.5) as f32;

            let mut taps = [0.0f32; FDN_ORDER];
            for (tap, (line, &len)) in taps
                .iter_mut()
                .zip(self.delay_lines.iter().zip(self.delay_lengths.iter()))
            {
                *tap = line.read(len);
            }

            let mut wet_l = 0.0f32;
            let mut wet_r = 0.0f32;
            for j in 0..FDN_ORDER {
                let mut mixed = 0.0f32;
                for k in 0..FDN_ORDER {
                    mixed += taps[k] * HADAMARD[j][k];
                }
                mixed *= HADAMARD_NORM;

                self.fdn_lp_z[j] = (1.0 - damping) * mixed + damping * self.fdn_lp_z[j];
                self.delay_lines[j].write(fdn_input + self.fdn_lp_z[j] * self.fdn_gains[j]);

                if j % 2 == 0 {
                    wet_l += taps[j];
                } else {
                    wet_r += taps[j];
                }
            }
            wet_l *= 0.5;
            wet_r *= 0.5;

            frame[0] = (wide_l * (1.0 - mix) + wet_l as f64 * mix) as f32;
            frame[1] = (wide_r * (1.0 - mix) + wet_r as f64 * mix) as f32;
        }
    }

    /// Map decay to per-line feedback gains: `0.001^(len / (decay * sr))`,
    /// a total kill at zero decay.
    fn update_gains(&mut self) {
        for (gain, &len) in self.fdn_gains.iter_mut().zip(self.delay_lengths.iter()) {
            *gain = if self.decay <= 0.0 {
                0.0
            } else {
                0.001_f64.powf(len as f64 / (self.decay as f64 * self.sample_rate)) as f32
            };
        }
    }

    fn configure_crossover(&mut self) {
        let lp = butterworth_lowpass(self.sample_rate, self.crossover_freq as f64);
        let hp = butterworth_highpass(self.sample_rate, self.crossover_freq as f64);
        for stage in 0..2 {
            self.mid_lp[stage].set_coeffs(lp);
            self.side_lp[stage].set_coeffs(lp);
            self.mid_hp[stage].set_coeffs(hp);
            self.side_hp[stage].set_coeffs(hp);
        }
    }
}
