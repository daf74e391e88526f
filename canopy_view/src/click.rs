// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Turning pointer down/up pairs into node clicks while nodes animate.
//!
//! A node can slide away from under the pointer between press and release, since a
//! transition may be running. A release over a different node (or over nothing)
//! still counts as a click on the pressed node when the pointer stayed close to
//! where it went down and the press was short.
//!
//! ```
//! use canopy_view::{ClickResult, ClickState};
//! use kurbo::Point;
//!
//! let mut clicks: ClickState<u32> = ClickState::with_thresholds(Some(5.0), Some(300));
//! clicks.on_down(7, Point::new(10.0, 10.0), 1000);
//!
//! // The node moved; the pointer is now over empty space but barely moved.
//! assert_eq!(clicks.on_up(None, Point::new(12.0, 11.0), 1100), ClickResult::Click(7));
//! ```

use kurbo::Point;

/// Default pointer travel tolerance, in surface units.
pub const DEFAULT_DISTANCE: f64 = 5.0;

/// Default press duration tolerance, in milliseconds.
pub const DEFAULT_TIME: u64 = 500;

/// Press/release state for a single pointer.
#[derive(Clone, Debug)]
pub struct ClickState<K> {
    press: Option<Press<K>>,
    /// Farthest the pointer may travel for a release elsewhere to still click; `None` is unlimited.
    pub distance_threshold: Option<f64>,
    /// Longest press, in milliseconds, for a release elsewhere to still click; `None` is unlimited.
    pub time_threshold: Option<u64>,
}

/// An active press.
#[derive(Clone, Debug, PartialEq)]
pub struct Press<K> {
    /// What was under the pointer.
    pub target: K,
    /// Where the pointer went down.
    pub position: Point,
    /// When, in milliseconds.
    pub time: u64,
    /// Set once the pointer travels past the distance threshold.
    pub moved_too_far: bool,
}

/// Outcome of a release.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickResult<K> {
    /// Click the pressed target.
    Click(K),
    /// No click. Carries the pressed target, if there was a press.
    Suppressed(Option<K>),
}

impl<K: PartialEq + Clone> Default for ClickState<K> {
    fn default() -> Self {
        Self::with_thresholds(Some(DEFAULT_DISTANCE), Some(DEFAULT_TIME))
    }
}

impl<K: PartialEq + Clone> ClickState<K> {
    /// Create a click state; both thresholds `None` means only same-target releases click.
    pub fn with_thresholds(distance_threshold: Option<f64>, time_threshold: Option<u64>) -> Self {
        Self {
            press: None,
            distance_threshold,
            time_threshold,
        }
    }

    /// Pointer went down over `target`. Replaces any earlier press.
    pub fn on_down(&mut self, target: K, position: Point, time: u64) {
        self.press = Some(Press {
            target,
            position,
            time,
            moved_too_far: false,
        });
    }

    /// Pointer moved. Returns `true` the first time it leaves the distance tolerance.
    pub fn on_move(&mut self, position: Point) -> bool {
        let (Some(press), Some(limit)) = (self.press.as_mut(), self.distance_threshold) else {
            return false;
        };
        if press.moved_too_far || press.position.distance(position) <= limit {
            return false;
        }
        press.moved_too_far = true;
        true
    }

    /// Pointer went up over `target` (or over nothing).
    pub fn on_up(&mut self, target: Option<&K>, position: Point, time: u64) -> ClickResult<K> {
        let Some(press) = self.press.take() else {
            return ClickResult::Suppressed(None);
        };
        if target == Some(&press.target) {
            return ClickResult::Click(press.target);
        }
        if (self.distance_threshold.is_none() && self.time_threshold.is_none())
            || press.moved_too_far
        {
            return ClickResult::Suppressed(Some(press.target));
        }
        let near = self
            .distance_threshold
            .is_none_or(|limit| press.position.distance(position) <= limit);
        let quick = self
            .time_threshold
            .is_none_or(|limit| time.saturating_sub(press.time) <= limit);
        if near && quick {
            ClickResult::Click(press.target)
        } else {
            ClickResult::Suppressed(Some(press.target))
        }
    }

    /// Forget the active press. Returns `true` if there was one.
    pub fn cancel(&mut self) -> bool {
        self.press.take().is_some()
    }

    /// The active press.
    pub fn press(&self) -> Option<&Press<K>> {
        self.press.as_ref()
    }
}
