// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: arena, materialization, expansion state, visible set.

use alloc::{vec, vec::Vec};
use canopy_store::{RecordId, TreeStore};
use kurbo::Point;
use tracing::{debug, warn};

use crate::error::{BrokenReference, DisplayError};
use crate::types::{Children, DisplayId, ExpansionState, RenderId, VisibleNode};

/// Lazily materialized display tree over a [`TreeStore`].
///
/// Only the root exists after construction. Children are created the first time
/// their parent is toggled open and are kept (hidden) when it is toggled closed, so
/// the store is read at most once per node.
///
/// ## Example
///
/// ```rust
/// use canopy_display::{DisplayTree, ExpansionState, Toggle};
/// use canopy_store::{StoreRecord, TreeStore};
///
/// let store = TreeStore::new(
///     "root",
///     [
///         StoreRecord::decision("root", "root", 5).with_children(["a", "b"]),
///         StoreRecord::action("a", "a", 3, 1.2),
///         StoreRecord::action("b", "b", 2, -0.4),
///     ],
/// )
/// .unwrap();
///
/// let mut tree = DisplayTree::new(&store);
/// let root = tree.root();
/// assert_eq!(tree.visible().len(), 1);
///
/// // First toggle loads the children from the store.
/// assert!(matches!(tree.toggle(root, &store), Ok(Toggle::Materialized(_))));
/// assert_eq!(tree.visible().len(), 3);
///
/// // Later toggles only move the cached list.
/// assert_eq!(tree.toggle(root, &store), Ok(Toggle::Collapsed));
/// assert_eq!(tree.state(root), Some(ExpansionState::Collapsed));
/// assert_eq!(tree.visible().len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct DisplayTree {
    nodes: Vec<Node>,
    next_render_id: u64,
}

#[derive(Clone, Debug)]
struct Node {
    record: RecordId,
    parent: Option<DisplayId>,
    depth: u32,
    children: Children,
    render_id: Option<RenderId>,
    /// Latest layout position.
    position: Point,
    /// Position at the end of the previous render pass; animation anchor.
    prior: Point,
}

impl Node {
    fn new(record: RecordId, parent: Option<DisplayId>, depth: u32) -> Self {
        Self {
            record,
            parent,
            depth,
            children: Children::Unloaded,
            render_id: None,
            position: Point::ZERO,
            prior: Point::ZERO,
        }
    }
}

/// Outcome of a successful materialization.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Materialized {
    /// Child ids that were listed but missing from the store, in listing order.
    pub broken: Vec<BrokenReference>,
}

/// Which transition a [`DisplayTree::toggle`] performed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Toggle {
    /// Expanded → Collapsed.
    Collapsed,
    /// Collapsed → Expanded, from the cached list.
    Expanded,
    /// Unloaded → Expanded, reading the store.
    Materialized(Materialized),
}

impl DisplayTree {
    /// Create a tree holding only a display node for the store's root.
    pub fn new(store: &TreeStore) -> Self {
        Self {
            nodes: vec![Node::new(store.root().clone(), None, 0)],
            next_render_id: 0,
        }
    }

    /// The root node.
    pub fn root(&self) -> DisplayId {
        DisplayId(0)
    }

    /// Number of materialized display nodes (visible or not).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: the root exists from construction.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns `true` if `id` names a node of this tree.
    pub fn contains(&self, id: DisplayId) -> bool {
        id.idx() < self.nodes.len()
    }

    /// Materialize the children of an unloaded node.
    ///
    /// Reads the node's record and creates one display node per listed child id, in
    /// order. A child id missing from the store is skipped and reported in
    /// [`Materialized::broken`]; its siblings are still created. The node ends up
    /// expanded, possibly with an empty list.
    pub fn materialize(
        &mut self,
        id: DisplayId,
        store: &TreeStore,
    ) -> Result<Materialized, DisplayError> {
        let node = self.node_checked(id)?;
        if node.children != Children::Unloaded {
            return Err(DisplayError::AlreadyMaterialized(id));
        }
        let record = store
            .get(node.record.as_str())
            .ok_or_else(|| DisplayError::MissingRecord(node.record.clone()))?;
        let depth = node.depth + 1;

        let mut children = Vec::with_capacity(record.child_ids.len());
        let mut broken = Vec::new();
        for child in &record.child_ids {
            if store.contains(child.as_str()) {
                children.push(self.push_node(child.clone(), id, depth));
            } else {
                warn!(child = %child, parent = %record.id, "child id missing from tree data");
                broken.push(BrokenReference {
                    child: child.clone(),
                    parent: record.id.clone(),
                });
            }
        }
        debug!(
            node = %record.id,
            children = children.len(),
            broken = broken.len(),
            "materialized"
        );
        self.node_mut(id).children = Children::Expanded(children);
        Ok(Materialized { broken })
    }

    /// Apply a click to `id`.
    ///
    /// | state | result |
    /// |---|---|
    /// | Expanded | Collapsed, list kept |
    /// | Collapsed | Expanded, same list |
    /// | Unloaded | [`materialize`](Self::materialize), then Expanded |
    pub fn toggle(&mut self, id: DisplayId, store: &TreeStore) -> Result<Toggle, DisplayError> {
        let node = self.node_checked_mut(id)?;
        match core::mem::take(&mut node.children) {
            Children::Expanded(list) => {
                node.children = Children::Collapsed(list);
                Ok(Toggle::Collapsed)
            }
            Children::Collapsed(list) => {
                node.children = Children::Expanded(list);
                Ok(Toggle::Expanded)
            }
            Children::Unloaded => self.materialize(id, store).map(Toggle::Materialized),
        }
    }

    /// Collapse `id` and every expanded node below it.
    ///
    /// Nothing is discarded; each collapsed list is retained for re-expansion.
    pub fn collapse_subtree(&mut self, id: DisplayId) -> Result<(), DisplayError> {
        self.node_checked(id)?;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = self.node_mut(current);
            node.children = match core::mem::take(&mut node.children) {
                Children::Expanded(list) => {
                    stack.extend(list.iter().copied());
                    Children::Collapsed(list)
                }
                other => other,
            };
        }
        Ok(())
    }

    /// The visible set in pre-order: the root plus every node whose ancestors are all expanded.
    ///
    /// Siblings keep their store order, and each entry links to its parent's index in the
    /// returned list.
    pub fn visible(&self) -> Vec<VisibleNode> {
        let mut out = Vec::new();
        // (node, parent index in `out`)
        let mut stack = vec![(self.root(), None)];
        while let Some((id, parent)) = stack.pop() {
            let index = out.len();
            let node = self.node(id);
            out.push(VisibleNode {
                id,
                parent,
                depth: node.depth,
            });
            if let Some(children) = node.children.expanded() {
                // Reversed so the first child is visited first.
                for &child in children.iter().rev() {
                    stack.push((child, Some(index)));
                }
            }
        }
        out
    }

    /// Returns `true` if `id` is in the visible set: every ancestor is expanded.
    pub fn is_visible(&self, id: DisplayId) -> bool {
        if !self.contains(id) {
            return false;
        }
        let mut current = id;
        while let Some(parent) = self.parent_of(current) {
            if self.state(parent) != Some(ExpansionState::Expanded) {
                return false;
            }
            current = parent;
        }
        true
    }

    /// The store id a node refers to.
    pub fn record_of(&self, id: DisplayId) -> Option<&RecordId> {
        self.nodes.get(id.idx()).map(|n| &n.record)
    }

    /// The parent of a node, or `None` for the root or unknown ids.
    pub fn parent_of(&self, id: DisplayId) -> Option<DisplayId> {
        self.nodes.get(id.idx()).and_then(|n| n.parent)
    }

    /// Distance from the root.
    pub fn depth_of(&self, id: DisplayId) -> Option<u32> {
        self.nodes.get(id.idx()).map(|n| n.depth)
    }

    /// The node's children state.
    pub fn children(&self, id: DisplayId) -> Option<&Children> {
        self.nodes.get(id.idx()).map(|n| &n.children)
    }

    /// The expansion state of a node.
    pub fn state(&self, id: DisplayId) -> Option<ExpansionState> {
        self.children(id).map(Children::state)
    }

    /// Shown children of an expanded node.
    pub fn expanded_children(&self, id: DisplayId) -> Option<&[DisplayId]> {
        self.children(id).and_then(Children::expanded)
    }

    /// Hidden children of a collapsed node.
    pub fn collapsed_children(&self, id: DisplayId) -> Option<&[DisplayId]> {
        self.children(id).and_then(Children::collapsed)
    }

    /// The stable render identity, if the node has been rendered.
    pub fn render_id(&self, id: DisplayId) -> Option<RenderId> {
        self.nodes.get(id.idx()).and_then(|n| n.render_id)
    }

    /// The stable render identity, assigning a fresh one on first call.
    pub fn render_id_or_assign(&mut self, id: DisplayId) -> Option<RenderId> {
        let next = &mut self.next_render_id;
        let node = self.nodes.get_mut(id.idx())?;
        Some(*node.render_id.get_or_insert_with(|| {
            *next += 1;
            RenderId(*next)
        }))
    }

    /// Latest layout position.
    pub fn position(&self, id: DisplayId) -> Option<Point> {
        self.nodes.get(id.idx()).map(|n| n.position)
    }

    /// Record a freshly computed layout position.
    pub fn set_position(&mut self, id: DisplayId, position: Point) {
        if let Some(n) = self.nodes.get_mut(id.idx()) {
            n.position = position;
        }
    }

    /// Position at the end of the previous render pass.
    pub fn prior(&self, id: DisplayId) -> Option<Point> {
        self.nodes.get(id.idx()).map(|n| n.prior)
    }

    /// Override the animation anchor, for example to seed the root before the first pass.
    pub fn set_prior(&mut self, id: DisplayId, prior: Point) {
        if let Some(n) = self.nodes.get_mut(id.idx()) {
            n.prior = prior;
        }
    }

    /// Copy each node's current position into its prior position.
    pub fn stash_positions(&mut self, ids: impl IntoIterator<Item = DisplayId>) {
        for id in ids {
            if let Some(n) = self.nodes.get_mut(id.idx()) {
                n.prior = n.position;
            }
        }
    }

    // --- internals ---

    fn push_node(&mut self, record: RecordId, parent: DisplayId, depth: u32) -> DisplayId {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "DisplayId slots are 32-bit."
        )]
        let id = DisplayId(self.nodes.len() as u32);
        self.nodes.push(Node::new(record, Some(parent), depth));
        id
    }

    /// Access a node known to exist; panics if `id` is foreign.
    fn node(&self, id: DisplayId) -> &Node {
        &self.nodes[id.idx()]
    }

    fn node_mut(&mut self, id: DisplayId) -> &mut Node {
        &mut self.nodes[id.idx()]
    }

    fn node_checked(&self, id: DisplayId) -> Result<&Node, DisplayError> {
        self.nodes
            .get(id.idx())
            .ok_or(DisplayError::UnknownNode(id))
    }

    fn node_checked_mut(&mut self, id: DisplayId) -> Result<&mut Node, DisplayError> {
        self.nodes
            .get_mut(id.idx())
            .ok_or(DisplayError::UnknownNode(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_store::StoreRecord;

    fn scenario() -> TreeStore {
        TreeStore::new(
            "root",
            [
                StoreRecord::decision("root", "root", 5).with_children(["a", "b"]),
                StoreRecord::action("a", "a", 3, 1.2).with_children(["c"]),
                StoreRecord::action("b", "b", 2, -0.4),
                StoreRecord::decision("c", "c", 1),
            ],
        )
        .unwrap()
    }

    fn records(tree: &DisplayTree, ids: &[DisplayId]) -> Vec<RecordId> {
        ids.iter()
            .map(|&id| tree.record_of(id).unwrap().clone())
            .collect()
    }

    #[test]
    fn root_starts_unloaded_and_alone() {
        let store = scenario();
        let tree = DisplayTree::new(&store);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.state(tree.root()), Some(ExpansionState::Unloaded));
        assert_eq!(tree.expanded_children(tree.root()), None);
        assert_eq!(tree.collapsed_children(tree.root()), None);
        assert_eq!(tree.record_of(tree.root()).unwrap().as_str(), "root");
    }

    #[test]
    fn collapse_then_expand_is_lossless() {
        let store = scenario();
        let mut tree = DisplayTree::new(&store);
        let root = tree.root();
        tree.toggle(root, &store).unwrap();
        let before = tree.expanded_children(root).unwrap().to_vec();
        let render_ids: Vec<_> = before
            .iter()
            .map(|&c| tree.render_id_or_assign(c).unwrap())
            .collect();

        assert_eq!(tree.toggle(root, &store), Ok(Toggle::Collapsed));
        assert_eq!(tree.expanded_children(root), None);
        assert_eq!(tree.collapsed_children(root), Some(&before[..]));

        assert_eq!(tree.toggle(root, &store), Ok(Toggle::Expanded));
        let after = tree.expanded_children(root).unwrap().to_vec();
        assert_eq!(before, after);
        let render_after: Vec<_> = after.iter().map(|&c| tree.render_id(c).unwrap()).collect();
        assert_eq!(render_ids, render_after);
        assert_eq!(records(&tree, &after), [RecordId::from("a"), RecordId::from("b")]);
        // No new nodes were created by the second expansion.
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn materialize_twice_is_refused() {
        let store = scenario();
        let mut tree = DisplayTree::new(&store);
        let root = tree.root();
        tree.materialize(root, &store).unwrap();
        assert_eq!(
            tree.materialize(root, &store),
            Err(DisplayError::AlreadyMaterialized(root))
        );
        tree.toggle(root, &store).unwrap();
        assert_eq!(
            tree.materialize(root, &store),
            Err(DisplayError::AlreadyMaterialized(root))
        );
    }

    #[test]
    fn leaf_expands_to_empty_list() {
        let store = scenario();
        let mut tree = DisplayTree::new(&store);
        let root = tree.root();
        tree.toggle(root, &store).unwrap();
        let b = tree.expanded_children(root).unwrap()[1];
        let outcome = tree.toggle(b, &store).unwrap();
        assert_eq!(outcome, Toggle::Materialized(Materialized::default()));
        assert_eq!(tree.state(b), Some(ExpansionState::Expanded));
        assert_eq!(tree.expanded_children(b), Some(&[][..]));
    }

    #[test]
    fn broken_reference_skips_only_that_child() {
        let store = TreeStore::new(
            "p",
            [
                StoreRecord::decision("p", "p", 1).with_children(["ghost", "ok"]),
                StoreRecord::decision("ok", "ok", 1),
            ],
        )
        .unwrap();
        let mut tree = DisplayTree::new(&store);
        let root = tree.root();
        let outcome = tree.materialize(root, &store).unwrap();
        assert_eq!(
            outcome.broken,
            [BrokenReference {
                child: RecordId::from("ghost"),
                parent: RecordId::from("p"),
            }]
        );
        let kids = tree.expanded_children(root).unwrap();
        assert_eq!(records(&tree, kids), [RecordId::from("ok")]);
        assert_eq!(
            alloc::format!("{}", outcome.broken[0]),
            "bad node id: ghost (in node p)"
        );
    }

    #[test]
    fn visible_set_follows_expanded_paths_only() {
        let store = scenario();
        let mut tree = DisplayTree::new(&store);
        let root = tree.root();
        tree.toggle(root, &store).unwrap();
        let a = tree.expanded_children(root).unwrap()[0];
        tree.toggle(a, &store).unwrap();

        let vis = tree.visible();
        let ids: Vec<_> = vis.iter().map(|v| tree.record_of(v.id).unwrap().as_str()).collect();
        assert_eq!(ids, ["root", "a", "c", "b"]);
        assert_eq!(vis[0].parent, None);
        assert_eq!(vis[1].parent, Some(0));
        assert_eq!(vis[2].parent, Some(1));
        assert_eq!(vis[3].parent, Some(0));
        assert_eq!(vis[2].depth, 2);

        assert!(vis.iter().all(|v| tree.is_visible(v.id)));

        // Collapsing the root hides the grandchild too, but a stays expanded underneath.
        tree.toggle(root, &store).unwrap();
        assert_eq!(tree.visible().len(), 1);
        assert!(tree.is_visible(root));
        assert!(!tree.is_visible(a));
        assert!(!tree.is_visible(vis[2].id));
        assert_eq!(tree.state(a), Some(ExpansionState::Expanded));
        tree.toggle(root, &store).unwrap();
        assert_eq!(tree.visible().len(), 4);
    }

    #[test]
    fn collapse_subtree_collapses_expanded_descendants() {
        let store = scenario();
        let mut tree = DisplayTree::new(&store);
        let root = tree.root();
        tree.toggle(root, &store).unwrap();
        let [a, b] = tree.expanded_children(root).unwrap()[..] else {
            panic!("expected two children");
        };
        tree.toggle(a, &store).unwrap();

        tree.collapse_subtree(root).unwrap();
        assert_eq!(tree.state(root), Some(ExpansionState::Collapsed));
        assert_eq!(tree.state(a), Some(ExpansionState::Collapsed));
        assert_eq!(tree.state(b), Some(ExpansionState::Unloaded));
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn render_ids_are_assigned_once_and_increase() {
        let store = scenario();
        let mut tree = DisplayTree::new(&store);
        let root = tree.root();
        assert_eq!(tree.render_id(root), None);
        let first = tree.render_id_or_assign(root).unwrap();
        assert_eq!(tree.render_id_or_assign(root), Some(first));
        tree.toggle(root, &store).unwrap();
        let a = tree.expanded_children(root).unwrap()[0];
        let second = tree.render_id_or_assign(a).unwrap();
        assert!(second > first);
    }

    #[test]
    fn positions_stash_into_prior() {
        let store = scenario();
        let mut tree = DisplayTree::new(&store);
        let root = tree.root();
        tree.set_prior(root, Point::new(50.0, 0.0));
        tree.set_position(root, Point::new(80.0, 0.0));
        assert_eq!(tree.prior(root), Some(Point::new(50.0, 0.0)));
        tree.stash_positions([root]);
        assert_eq!(tree.prior(root), Some(Point::new(80.0, 0.0)));
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let store = scenario();
        let mut tree = DisplayTree::new(&store);
        let bogus = DisplayId(99);
        assert!(!tree.contains(bogus));
        assert_eq!(
            tree.toggle(bogus, &store),
            Err(DisplayError::UnknownNode(bogus))
        );
        assert!(tree.collapse_subtree(bogus).is_err());
        assert_eq!(tree.position(bogus), None);
    }
}
