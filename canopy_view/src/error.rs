// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_display::{DisplayError, DisplayId};
use canopy_layout::HierarchyError;

use crate::host::ContainerId;

/// Errors from building or updating a [`TreeView`](crate::TreeView).
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// The host could not measure the container.
    #[error("container `{0}` not found")]
    ContainerNotFound(ContainerId),
    /// The node exists but an ancestor hides it, so it cannot be clicked.
    #[error("display node {0:?} is not shown")]
    Hidden(DisplayId),
    /// A display tree operation failed.
    #[error(transparent)]
    Display(#[from] DisplayError),
    /// The visible set did not form a single tree.
    #[error(transparent)]
    Layout(#[from] HierarchyError),
}
