// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Edge stroke width from visit counts.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// Maps a child's visit count to the stroke width of the edge leading to it.
///
/// `width = scale · ln(visits + 2) / ln(max_visits)`, clamped at zero, where
/// `max_visits` is the largest visit count in the whole store. Stores whose
/// maximum is below 2 use 2 in the denominator so the width stays finite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeWeight {
    scale: f64,
    denominator: f64,
}

impl EdgeWeight {
    /// Stroke scale used when none is configured.
    pub const DEFAULT_SCALE: f64 = 20.0;

    /// Create a weight function for a store whose global maximum is `max_visits`.
    pub fn new(scale: f64, max_visits: u64) -> Self {
        Self {
            scale,
            denominator: to_f64(max_visits.max(2)).ln(),
        }
    }

    /// Stroke width for an edge into a child visited `visits` times.
    pub fn width(&self, visits: u64) -> f64 {
        (self.scale * (to_f64(visits) + 2.0).ln() / self.denominator).max(0.0)
    }
}

#[allow(
    clippy::cast_precision_loss,
    reason = "visit counts beyond 2^53 lose precision, not order."
)]
fn to_f64(v: u64) -> f64 {
    v as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn more_visits_thicker_edge() {
        let w = EdgeWeight::new(20.0, 5);
        assert!(w.width(3) > w.width(2));
        // ln(3 + 2) / ln(5) is exactly one.
        assert!((w.width(3) - 20.0).abs() < 1e-12, "{}", w.width(3));
    }

    #[test]
    fn tiny_stores_stay_finite() {
        for max in [0, 1, 2] {
            let w = EdgeWeight::new(10.0, max);
            assert!(w.width(0).is_finite());
            assert!(w.width(0) > 0.0);
        }
    }

    #[test]
    fn negative_scale_clamps_to_zero() {
        assert_eq!(EdgeWeight::new(-1.0, 100).width(50), 0.0);
    }
}
