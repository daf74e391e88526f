// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time-based interpolation between two values.
//!
//! Time is a host-supplied millisecond clock (`u64`), the same unit pointer
//! timestamps use. Tweens are pure values: sampling never mutates them, so a
//! surface can render any instant without ticking.

use kurbo::Point;

use crate::easing::{EasingFn, cubic_in_out};

/// Values a [`Tween`] can interpolate.
pub trait Lerp: Copy {
    /// Interpolate from `self` (`t = 0`) to `other` (`t = 1`).
    fn lerp(self, other: Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(self, other: Self, t: f64) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for Point {
    fn lerp(self, other: Self, t: f64) -> Self {
        self + (other - self) * t
    }
}

/// The timing shared by every tween started in one render pass.
#[derive(Clone, Copy, Debug)]
pub struct Transition {
    /// Start time in milliseconds.
    pub start: u64,
    /// Length in milliseconds. Zero completes immediately.
    pub duration: u64,
    /// Easing curve.
    pub easing: EasingFn,
}

impl Transition {
    /// A transition starting at `start` with cubic-in-out easing.
    pub fn new(start: u64, duration: u64) -> Self {
        Self {
            start,
            duration,
            easing: cubic_in_out,
        }
    }

    /// Replace the easing curve.
    #[must_use]
    pub fn with_easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Time at which the transition completes.
    pub fn end(&self) -> u64 {
        self.start.saturating_add(self.duration)
    }

    /// Returns `true` once `now` has reached the end.
    pub fn is_finished(&self, now: u64) -> bool {
        now >= self.end()
    }

    /// Eased progress at `now`, in `[0, 1]`.
    pub fn progress(&self, now: u64) -> f64 {
        if self.duration == 0 || self.is_finished(now) {
            return 1.0;
        }
        #[allow(
            clippy::cast_precision_loss,
            reason = "millisecond spans are far below 2^52."
        )]
        let raw = now.saturating_sub(self.start) as f64 / self.duration as f64;
        (self.easing)(raw)
    }
}

/// A value moving from `from` to `to` over a [`Transition`].
#[derive(Clone, Copy, Debug)]
pub struct Tween<T> {
    /// Value at the start.
    pub from: T,
    /// Value at the end.
    pub to: T,
    /// Timing.
    pub transition: Transition,
}

impl<T: Lerp> Tween<T> {
    /// Create a tween.
    pub fn new(from: T, to: T, transition: Transition) -> Self {
        Self {
            from,
            to,
            transition,
        }
    }

    /// The interpolated value at `now`.
    pub fn sample(&self, now: u64) -> T {
        self.from.lerp(self.to, self.transition.progress(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::linear;

    #[test]
    fn samples_between_endpoints() {
        let t = Transition::new(1000, 100).with_easing(linear);
        let tw = Tween::new(Point::new(0.0, 0.0), Point::new(10.0, 20.0), t);
        assert_eq!(tw.sample(0), Point::new(0.0, 0.0));
        assert_eq!(tw.sample(1000), Point::new(0.0, 0.0));
        assert_eq!(tw.sample(1050), Point::new(5.0, 10.0));
        assert_eq!(tw.sample(1100), Point::new(10.0, 20.0));
        assert_eq!(tw.sample(5000), Point::new(10.0, 20.0));
    }

    #[test]
    fn zero_duration_is_instant() {
        let tw = Tween::new(1.0, 3.0, Transition::new(10, 0));
        assert!(tw.transition.is_finished(10));
        assert_eq!(tw.sample(10), 3.0);
    }

    #[test]
    fn default_easing_is_cubic() {
        let tw = Tween::new(0.0, 1.0, Transition::new(0, 100));
        assert!(tw.sample(10) < 0.1);
        assert_eq!(tw.sample(50), 0.5);
    }
}
