// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damage summary returned with each render pass.

use alloc::vec::Vec;

use kurbo::Rect;

/// Regions touched by a render pass, in content coordinates.
///
/// Each entry covers one element's whole transition (start and end), so the
/// rectangles overlap and are not a minimal cover.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Damage {
    /// Rectangles that should be repainted while the pass animates.
    pub dirty_rects: Vec<Rect>,
}

impl Damage {
    /// Record a touched region.
    pub fn add(&mut self, rect: Rect) {
        self.dirty_rects.push(rect);
    }

    /// Returns `true` if nothing was touched.
    pub fn is_empty(&self) -> bool {
        self.dirty_rects.is_empty()
    }

    /// Returns the union of all damage rects.
    pub fn union_rect(&self) -> Option<Rect> {
        let mut it = self.dirty_rects.iter().copied();
        let first = it.next()?;
        Some(it.fold(first, |acc, r| acc.union(r)))
    }
}
