// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_store::RecordId;

use crate::types::DisplayId;

/// Errors from display tree operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DisplayError {
    /// The identifier does not name a node of this tree.
    #[error("display node {0:?} does not belong to this tree")]
    UnknownNode(DisplayId),
    /// Materialization requires an unloaded node.
    #[error("display node {0:?} is already materialized")]
    AlreadyMaterialized(DisplayId),
    /// The node's own record is not in the store it is being materialized from.
    #[error("node id {0} has no record in the tree data")]
    MissingRecord(RecordId),
}

/// A child identifier listed by a record but absent from the store.
///
/// Recovered locally: the child is skipped and its siblings are still materialized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("bad node id: {child} (in node {parent})")]
pub struct BrokenReference {
    /// The missing child id.
    pub child: RecordId,
    /// The record that listed it.
    pub parent: RecordId,
}
