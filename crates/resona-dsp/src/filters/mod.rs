// SPDX-License-Identifier: LGPL-3.0-or-later

//! Biquad filter sections and coefficient designers.

pub mod biquad;
pub mod coeffs;

pub use biquad::Biquad;
pub use coeffs::{BiquadCoeffs, FilterType};
