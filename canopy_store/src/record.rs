// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Record types: identifiers, node kinds, and the records themselves.

use alloc::{
    format,
    string::{String, ToString},
    sync::Arc,
    vec::Vec,
};
use core::borrow::Borrow;
use core::fmt;

/// Identifier of a record in a [`TreeStore`](crate::TreeStore).
///
/// Cheap to clone; many display nodes may hold the same id.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(Arc<str>);

impl RecordId {
    /// Create an identifier from any string-like value.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RecordId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self::from(id.to_string())
    }
}

/// What a record represents in the search tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeKind {
    /// A state.
    Decision,
    /// A state-action edge with its running value estimate.
    Action {
        /// Running value estimate (`Q`).
        value: f64,
    },
}

impl NodeKind {
    /// Returns `true` for action records.
    pub fn is_action(&self) -> bool {
        matches!(self, Self::Action { .. })
    }

    /// The value estimate of an action record.
    pub fn value(&self) -> Option<f64> {
        match *self {
            Self::Action { value } => Some(value),
            Self::Decision => None,
        }
    }
}

/// A node of the search tree as supplied by the host.
#[derive(Clone, Debug, PartialEq)]
pub struct StoreRecord {
    /// Unique identifier, stable for the lifetime of the store.
    pub id: RecordId,
    /// Short label.
    pub tag: String,
    /// Explicit tooltip. When `None`, [`StoreRecord::tooltip_text`] derives one.
    pub tooltip: Option<String>,
    /// Decision or action.
    pub kind: NodeKind,
    /// Number of times the planner traversed this node.
    pub visit_count: u64,
    /// Children in planner order. Empty for leaves.
    pub child_ids: Vec<RecordId>,
}

impl StoreRecord {
    /// Create a decision record with no children.
    pub fn decision(id: impl Into<RecordId>, tag: impl Into<String>, visit_count: u64) -> Self {
        Self {
            id: id.into(),
            tag: tag.into(),
            tooltip: None,
            kind: NodeKind::Decision,
            visit_count,
            child_ids: Vec::new(),
        }
    }

    /// Create an action record with no children.
    pub fn action(
        id: impl Into<RecordId>,
        tag: impl Into<String>,
        visit_count: u64,
        value: f64,
    ) -> Self {
        Self {
            id: id.into(),
            tag: tag.into(),
            tooltip: None,
            kind: NodeKind::Action { value },
            visit_count,
            child_ids: Vec::new(),
        }
    }

    /// Replace the child list.
    #[must_use]
    pub fn with_children<I, T>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<RecordId>,
    {
        self.child_ids = children.into_iter().map(Into::into).collect();
        self
    }

    /// Set an explicit tooltip.
    #[must_use]
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Tooltip text: the explicit tooltip if present, otherwise tag, id and statistics.
    pub fn tooltip_text(&self) -> String {
        if let Some(tt) = &self.tooltip {
            return tt.clone();
        }
        let mut text = format!("{}\nid: {}\nN: {}", self.tag, self.id, self.visit_count);
        if let NodeKind::Action { value } = self.kind {
            text.push_str(&format!("\nQ: {value}"));
        }
        text
    }
}
