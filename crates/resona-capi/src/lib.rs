// SPDX-License-Identifier: LGPL-3.0-or-later

//! # resona-capi
//!
//! Opaque-handle C ABI over [`resona_dsp`], the boundary the web host
//! links against. Every entry point takes a handle returned by the
//! matching `create_*` function.
//!
//! ## Contract
//!
//! - The host rejects null handles before calling in; entry points assume
//!   handles are valid and non-null.
//! - Buffer pointers must reference at least `num_samples` floats for the
//!   equalizer and `2 * num_frames` floats for the spatializer.
//! - No ownership crosses the boundary except through `create_*` /
//!   `destroy_*` pairs.
//! - Validation inside the core is silent-safe: out-of-range indices are
//!   no-ops, out-of-range values are clamped, and nothing is fatal.

mod equalizer;
mod preset;
mod spatializer;

pub use equalizer::*;
pub use preset::{BandParamsC, CompactPresetC};
pub use spatializer::*;
