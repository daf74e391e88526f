// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parent-to-child edge curves.

use kurbo::{BezPath, CubicBez, Point, Rect, Shape};

/// Vertical S-curve from `source` to `target`.
///
/// Both control points sit at mid-depth, directly below the source and directly
/// above the target, so edges leave and enter nodes vertically.
pub fn diagonal(source: Point, target: Point) -> CubicBez {
    let mid = (source.y + target.y) / 2.0;
    CubicBez::new(
        source,
        Point::new(source.x, mid),
        Point::new(target.x, mid),
        target,
    )
}

/// The curve as a path, for surfaces that draw paths.
pub fn diagonal_path(source: Point, target: Point) -> BezPath {
    diagonal(source, target).into_path(0.1)
}

/// Bounding box of a diagonal.
///
/// The control points never leave the box spanned by the endpoints.
pub fn diagonal_bounds(source: Point, target: Point) -> Rect {
    Rect::from_points(source, target)
}
