// SPDX-License-Identifier: LGPL-3.0-or-later

//! Shared processing utilities.

pub mod delay;

pub use delay::DelayLine;
