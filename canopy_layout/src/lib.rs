// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Layout: deterministic tidy tree layout for the visible part of a search tree.
//!
//! The input is a [`Hierarchy`]: nodes numbered so that every parent precedes its
//! children, which is exactly what a pre-order visible set provides. The output of
//! [`TreeLayout::compute`] is one [`kurbo::Point`] per node, inside
//! `[0, width] × [0, height]`.
//!
//! Placement follows the classic tidy tree rules (Buchheim, Jünger and Leipert's
//! linear-time refinement of Walker's algorithm):
//!
//! - Sibling subtrees never overlap.
//! - A parent sits centered over its first and last child.
//! - Siblings keep their hierarchy order.
//! - Nodes with different parents get a wider gap than siblings (see [`Separation`]).
//!
//! The breadth axis is then scaled so that the outermost nodes sit half a separation
//! inside the box, and the depth axis so that the deepest level touches the bottom.
//! Nothing depends on a previous layout; every call computes a fresh snapshot.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod hierarchy;
mod tidy;

pub use hierarchy::{Hierarchy, HierarchyError};
pub use tidy::{Separation, TreeLayout};
