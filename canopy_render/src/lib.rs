// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Render: keyed diff-and-animate rendering for a laid-out search tree.
//!
//! Every update produces a [`Frame`]: the visible nodes, each with its stable
//! [`RenderId`](canopy_display::RenderId), layout position, [`NodeVisual`] and the
//! [`EdgeWeight`] of the edge from its parent. A [`Scene`] diffs each frame against
//! the elements it retains and returns a [`RenderPass`]:
//!
//! - **Enter**: new identities grow out of the source node's prior position
//!   (radius and label opacity start near zero).
//! - **Update**: known identities move from wherever they currently are, even
//!   mid-transition, to their new position.
//! - **Exit**: identities missing from the frame shrink into the source node's new
//!   position and are dropped once their transition ends.
//!
//! Edges are keyed by their child node and drawn as vertical [`diagonal`] curves.
//! All transitions of a pass share one [`Transition`] (cubic-in-out by default)
//! on a host-supplied millisecond clock, so a [`Surface`] can sample any instant.
//!
//! [`SvgSurface`] is a retained reference surface that serializes snapshots as SVG.
//!
//! This crate is `no_std` and uses `alloc`. Enable either the `std` (default) or
//! `libm` feature for float math.

#![no_std]

extern crate alloc;

mod damage;
mod diagonal;
mod easing;
mod scene;
mod surface;
mod svg;
mod tween;
mod visual;
mod weight;

pub use damage::Damage;
pub use diagonal::{diagonal, diagonal_bounds, diagonal_path};
pub use easing::{EasingFn, cubic_in_out, linear};
pub use scene::{
    DEFAULT_DURATION, DEFAULT_RADIUS, EdgeOp, Frame, FrameNode, HIDDEN, NodeOp, Phase,
    RenderPass, Scene, SourceAnchor,
};
pub use surface::Surface;
pub use svg::SvgSurface;
pub use tween::{Lerp, Transition, Tween};
pub use visual::{Fill, NodeVisual, to_precision};
pub use weight::EdgeWeight;
