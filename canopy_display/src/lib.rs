// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Display: the lazily materialized display tree behind a search-tree view.
//!
//! A search tree can be far larger than anything worth drawing. This crate keeps a
//! second, sparse tree of display nodes that mirrors only the part of the store a
//! user has opened:
//!
//! - Each [`DisplayId`] refers to one store record by id (non-owning).
//! - Each node is in exactly one [`ExpansionState`]: `Unloaded`, `Expanded`, or
//!   `Collapsed`, carried structurally by [`Children`].
//! - [`DisplayTree::toggle`] implements the click transition. The first expansion
//!   materializes children from the store; later toggles only move the cached list.
//! - [`DisplayTree::visible`] yields the visible set (root plus everything below an
//!   unbroken chain of expanded ancestors) in pre-order, ready for layout.
//! - [`RenderId`]s are assigned once per node at first render and never change, so a
//!   renderer can match nodes across passes while layout moves them around.
//!
//! Broken child references (ids listed by a record but missing from the store) are
//! recovered locally and returned as [`BrokenReference`] values for the host to report.
//!
//! ## Where this fits
//!
//! - Store: immutable records (`canopy_store`).
//! - Display tree: interaction state and identity (this crate).
//! - Layout and render: positions and the animated scene (`canopy_layout`, `canopy_render`).
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod tree;
mod types;

pub use error::{BrokenReference, DisplayError};
pub use tree::{DisplayTree, Materialized, Toggle};
pub use types::{Children, DisplayId, ExpansionState, RenderId, VisibleNode};
