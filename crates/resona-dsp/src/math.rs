// SPDX-License-Identifier: LGPL-3.0-or-later

//! Horizontal (reduction) operations on float buffers.
//!
//! These feed the equalizer's rolling analysis window. Each function is
//! compiled for several SIMD targets and dispatched at runtime.

use multiversion::multiversion;

/// Sum of all elements.
#[multiversion(targets("x86_64+avx2+fma", "x86_64+avx", "x86_64+sse4.1", "aarch64+neon",))]
pub fn sum(src: &[f32]) -> f32 {
    src.iter().sum()
}

/// Sum of squares.
#[multiversion(targets("x86_64+avx2+fma", "x86_64+avx", "x86_64+sse4.1", "aarch64+neon",))]
pub fn sqr_sum(src: &[f32]) -> f32 {
    src.iter().map(|x| x * x).sum()
}

/// Sum of absolute values.
#[multiversion(targets("x86_64+avx2+fma", "x86_64+avx", "x86_64+sse4.1", "aarch64+neon",))]
pub fn abs_sum(src: &[f32]) -> f32 {
    src.iter().map(|x| x.abs()).sum()
}

/// Maximum absolute value (peak amplitude). Returns `0.0` for an empty buffer.
#[multiversion(targets("x86_64+avx2+fma", "x86_64+avx", "x86_64+sse4.1", "aarch64+neon",))]
pub fn abs_max(src: &[f32]) -> f32 {
    src.iter().fold(0.0f32, |m, x| m.max(x.abs()))
}

/// Root mean square. Returns `0.0` for an empty buffer.
#[multiversion(targets("x86_64+avx2+fma", "x86_64+avx", "x86_64+sse4.1", "aarch64+neon",))]
pub fn rms(src: &[f32]) -> f32 {
    if src.is_empty() {
        return 0.0;
    }
    (sqr_sum(src) / src.len() as f32).sqrt()
}

/// Mean absolute value. Returns `0.0` for an empty buffer.
#[multiversion(targets("x86_64+avx2+fma", "x86_64+avx", "x86_64+sse4.1", "aarch64+neon",))]
pub fn mean_abs(src: &[f32]) -> f32 {
    if src.is_empty() {
        return 0.0;
    }
    abs_sum(src) / src.len() as f32
}
