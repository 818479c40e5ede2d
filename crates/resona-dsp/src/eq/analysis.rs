// SPDX-License-Identifier: LGPL-3.0-or-later

//! Rolling audio analysis over a fixed 512-sample window.
//!
//! The ring collects the equalizer's input; every time the write index
//! wraps, a fresh [`AudioAnalysis`] is computed over the just-completed
//! window. Band energies use positional bucketing over the time-domain
//! samples — first 1/8 as bass, next 3/8 as mid, last 4/8 as treble — and
//! the centroid is derived from those bucket energies. This is a cheap
//! heuristic, not a spectral decomposition, and it is the canonical
//! behavior the adaptive preset scoring is tuned against.

use crate::math;

/// Number of samples in one analysis window.
pub const ANALYSIS_WINDOW: usize = 512;

const BASS_SPLIT: usize = ANALYSIS_WINDOW / 8;
const MID_SPLIT: usize = ANALYSIS_WINDOW / 2;

/// Feature snapshot of the last completed analysis window.
///
/// All values are non-negative. `#[repr(C)]` so the host can read it
/// through the boundary as a plain struct of six floats.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AudioAnalysis {
    /// Root mean square of the window.
    pub rms_level: f32,
    /// Largest absolute sample in the window.
    pub peak_level: f32,
    /// Heuristic centroid in Hz, derived from the bucket energies.
    pub spectral_centroid: f32,
    /// Mean absolute value of the bass bucket.
    pub bass_energy: f32,
    /// Mean absolute value of the mid bucket.
    pub mid_energy: f32,
    /// Mean absolute value of the treble bucket.
    pub treble_energy: f32,
}

/// Fixed-size analysis ring.
#[derive(Debug, Clone)]
pub(crate) struct AnalysisRing {
    buffer: Box<[f32; ANALYSIS_WINDOW]>,
    pos: usize,
}

impl AnalysisRing {
    pub fn new() -> Self {
        Self {
            buffer: Box::new([0.0; ANALYSIS_WINDOW]),
            pos: 0,
        }
    }

    /// Append one sample. Returns a fresh analysis exactly when the write
    /// index wraps, i.e. once every [`ANALYSIS_WINDOW`] samples.
    #[inline]
    pub fn push(&mut self, sample: f32) -> Option<AudioAnalysis> {
        self.buffer[self.pos] = sample;
        self.pos += 1;
        if self.pos == ANALYSIS_WINDOW {
            self.pos = 0;
            Some(self.compute())
        } else {
            None
        }
    }

    fn compute(&self) -> AudioAnalysis {
        let window = &self.buffer[..];
        let bass = math::mean_abs(&window[..BASS_SPLIT]);
        let mid = math::mean_abs(&window[BASS_SPLIT..MID_SPLIT]);
        let treble = math::mean_abs(&window[MID_SPLIT..]);

        AudioAnalysis {
            rms_level: math::rms(window),
            peak_level: math::abs_max(window),
            spectral_centroid: (mid * 1000.0 + treble * 4000.0) / (bass + mid + treble + 1e-10),
            bass_energy: bass,
            mid_energy: mid,
            treble_energy: treble,
        }
    }
}
