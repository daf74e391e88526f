// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the display tree: identifiers and child state.

use alloc::vec::Vec;

/// Identifier for a node in a [`DisplayTree`](crate::DisplayTree).
///
/// Slots are never reused: a node lives as long as the tree that owns it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct DisplayId(pub(crate) u32);

impl DisplayId {
    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Stable identity used to correlate a node across render passes.
///
/// Assigned once, the first time a node is rendered, from a per-tree counter.
/// It is independent of both the store id and the node's position.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct RenderId(pub u64);

/// Materialized children of a display node.
///
/// Holding both an expanded and a collapsed list at once is unrepresentable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Children {
    /// Children have never been loaded from the store.
    #[default]
    Unloaded,
    /// Children are shown. May be empty for a true leaf.
    Expanded(Vec<DisplayId>),
    /// Children were loaded, then hidden. Kept so re-expansion does not touch the store.
    Collapsed(Vec<DisplayId>),
}

impl Children {
    /// The coarse state.
    pub fn state(&self) -> ExpansionState {
        match self {
            Self::Unloaded => ExpansionState::Unloaded,
            Self::Expanded(_) => ExpansionState::Expanded,
            Self::Collapsed(_) => ExpansionState::Collapsed,
        }
    }

    /// The shown children, if expanded.
    pub fn expanded(&self) -> Option<&[DisplayId]> {
        match self {
            Self::Expanded(c) => Some(c),
            _ => None,
        }
    }

    /// The hidden children, if collapsed.
    pub fn collapsed(&self) -> Option<&[DisplayId]> {
        match self {
            Self::Collapsed(c) => Some(c),
            _ => None,
        }
    }
}

/// Expansion state of a display node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExpansionState {
    /// Never expanded.
    Unloaded,
    /// Children are shown.
    Expanded,
    /// Children are loaded but hidden.
    Collapsed,
}

/// One entry of the visible set.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VisibleNode {
    /// The node.
    pub id: DisplayId,
    /// Index of the parent within the same visible list; `None` for the root.
    pub parent: Option<usize>,
    /// Distance from the root.
    pub depth: u32,
}
