// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easing curves: map linear progress in `[0, 1]` to eased progress.

/// Easing function signature.
pub type EasingFn = fn(f64) -> f64;

/// Constant velocity.
#[inline]
pub fn linear(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

/// Cubic ease-in-out, the default for every transition.
#[inline]
pub fn cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}
