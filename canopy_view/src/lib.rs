// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy View: an interactive, incrementally expanded view of a search tree.
//!
//! [`TreeView`] ties the other Canopy crates together:
//!
//! 1. An event ([`ViewEvent`]) arrives: a resolved click, raw pointer input, or a resize.
//! 2. A click toggles one display node (`canopy_display`), loading its children
//!    from the store the first time.
//! 3. [`Viewport`] re-measures the container through the [`Host`] and subtracts
//!    [`Margins`].
//! 4. The visible set is laid out (`canopy_layout`) and reconciled against the
//!    retained scene (`canopy_render`), animating from the clicked node.
//! 5. The resulting pass goes to the [`Surface`](canopy_render::Surface).
//!
//! Raw pointer input is hit-tested against animated positions, and [`ClickState`]
//! keeps a click on a node that slid away between press and release.
//!
//! There is no global state. The maximum visit count and the container handle
//! live in a per-view [`ViewContext`], so independent views can share a page.
//!
//! This crate is `no_std` and uses `alloc`. Time is whatever millisecond clock
//! the host passes in.

#![no_std]

extern crate alloc;

mod click;
mod config;
mod error;
mod host;
mod view;
mod viewport;

pub use click::{ClickResult, ClickState, DEFAULT_DISTANCE, DEFAULT_TIME, Press};
pub use config::{Margins, ViewConfig, ViewContext};
pub use error::ViewError;
pub use host::{ContainerId, Host};
pub use view::{TreeView, ViewEvent};
pub use viewport::{Bounds, Viewport, surface_name};
