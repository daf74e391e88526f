// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat, index-based tree description fed to the layout.

use alloc::vec::Vec;
use smallvec::SmallVec;

/// Errors from building a [`Hierarchy`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HierarchyError {
    /// Node 0 must be the root and no other node may be parentless.
    #[error("node {0} has no parent but is not the first node")]
    ExtraRoot(usize),
    /// The first node was given a parent.
    #[error("the first node must be the root")]
    RootHasParent,
    /// Parents must be pushed before their children.
    #[error("node {index} refers to parent {parent}, which does not precede it")]
    ParentNotBefore {
        /// The offending node.
        index: usize,
        /// Its declared parent.
        parent: usize,
    },
}

/// A single-rooted tree whose nodes are numbered so that every parent precedes its children.
///
/// Children keep the order in which they were pushed; the layout uses that order to
/// break ties left to right.
///
/// A pre-order listing (such as a visible set) satisfies the numbering rule directly.
#[derive(Clone, Debug, Default)]
pub struct Hierarchy {
    parents: Vec<Option<usize>>,
    children: Vec<SmallVec<[usize; 4]>>,
    depths: Vec<u32>,
}

impl Hierarchy {
    /// Create an empty hierarchy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a hierarchy from one parent index per node, in node order.
    pub fn from_parents(
        parents: impl IntoIterator<Item = Option<usize>>,
    ) -> Result<Self, HierarchyError> {
        let mut h = Self::new();
        for parent in parents {
            h.push(parent)?;
        }
        Ok(h)
    }

    /// Append a node and return its index.
    ///
    /// The first node must be the root (`None`); every later node must name an
    /// already-pushed parent.
    pub fn push(&mut self, parent: Option<usize>) -> Result<usize, HierarchyError> {
        let index = self.parents.len();
        let depth = match (index, parent) {
            (0, None) => 0,
            (0, Some(_)) => return Err(HierarchyError::RootHasParent),
            (_, None) => return Err(HierarchyError::ExtraRoot(index)),
            (_, Some(p)) if p >= index => {
                return Err(HierarchyError::ParentNotBefore { index, parent: p });
            }
            (_, Some(p)) => {
                self.children[p].push(index);
                self.depths[p] + 1
            }
        };
        self.parents.push(parent);
        self.children.push(SmallVec::new());
        self.depths.push(depth);
        Ok(index)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// Returns `true` if no node has been pushed.
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Parent of a node.
    pub fn parent(&self, index: usize) -> Option<usize> {
        self.parents.get(index).copied().flatten()
    }

    /// Children of a node, in push order.
    pub fn children(&self, index: usize) -> &[usize] {
        self.children.get(index).map_or(&[][..], |c| c.as_slice())
    }

    /// Depth of a node; the root is at depth 0.
    pub fn depth(&self, index: usize) -> u32 {
        self.depths.get(index).copied().unwrap_or(0)
    }

    /// Greatest depth of any node.
    pub fn max_depth(&self) -> u32 {
        self.depths.iter().copied().max().unwrap_or(0)
    }
}
