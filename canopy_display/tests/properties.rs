// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for expansion state and the visible set.

use canopy_display::{Children, DisplayId, DisplayTree, ExpansionState, Toggle};
use canopy_store::{StoreRecord, TreeStore};
use proptest::prelude::*;

/// Build a store from a parent vector: node `i > 0` is a child of `parents[i - 1] % i`.
fn store_from_parents(parents: &[usize]) -> TreeStore {
    let n = parents.len() + 1;
    let mut children: Vec<Vec<String>> = vec![Vec::new(); n];
    for (i, p) in parents.iter().enumerate() {
        let child = i + 1;
        children[p % child].push(format!("n{child}"));
    }
    let records = children.into_iter().enumerate().map(|(i, kids)| {
        StoreRecord::decision(format!("n{i}"), format!("t{i}"), i as u64).with_children(kids)
    });
    TreeStore::new("n0", records).unwrap()
}

/// Every materialized node, found by walking both expanded and collapsed lists.
fn all_nodes(tree: &DisplayTree) -> Vec<DisplayId> {
    let mut out = Vec::new();
    let mut stack = vec![tree.root()];
    while let Some(id) = stack.pop() {
        out.push(id);
        match tree.children(id).unwrap() {
            Children::Expanded(list) | Children::Collapsed(list) => stack.extend(list),
            Children::Unloaded => {}
        }
    }
    out
}

fn ancestors_all_expanded(tree: &DisplayTree, id: DisplayId) -> bool {
    let mut current = id;
    while let Some(parent) = tree.parent_of(current) {
        if tree.state(parent) != Some(ExpansionState::Expanded) {
            return false;
        }
        current = parent;
    }
    true
}

fn apply_clicks(tree: &mut DisplayTree, store: &TreeStore, clicks: &[usize]) {
    for &pick in clicks {
        let visible = tree.visible();
        let id = visible[pick % visible.len()].id;
        tree.toggle(id, store).unwrap();
    }
}

proptest! {
    #[test]
    fn visible_set_is_root_plus_expanded_chains(
        parents in prop::collection::vec(0_usize..64, 0..40),
        clicks in prop::collection::vec(0_usize..64, 0..60),
    ) {
        let store = store_from_parents(&parents);
        let mut tree = DisplayTree::new(&store);
        apply_clicks(&mut tree, &store, &clicks);

        let mut visible: Vec<_> = tree.visible().iter().map(|v| v.id).collect();
        let mut expected: Vec<_> = all_nodes(&tree)
            .into_iter()
            .filter(|&id| ancestors_all_expanded(&tree, id))
            .collect();
        visible.sort();
        expected.sort();
        prop_assert_eq!(visible, expected);
    }

    #[test]
    fn never_both_lists(
        parents in prop::collection::vec(0_usize..64, 0..40),
        clicks in prop::collection::vec(0_usize..64, 0..60),
    ) {
        let store = store_from_parents(&parents);
        let mut tree = DisplayTree::new(&store);
        apply_clicks(&mut tree, &store, &clicks);
        for id in all_nodes(&tree) {
            prop_assert!(
                !(tree.expanded_children(id).is_some() && tree.collapsed_children(id).is_some())
            );
        }
    }

    #[test]
    fn double_toggle_of_expanded_node_is_lossless(
        parents in prop::collection::vec(0_usize..64, 1..40),
        clicks in prop::collection::vec(0_usize..64, 0..60),
        pick in 0_usize..64,
    ) {
        let store = store_from_parents(&parents);
        let mut tree = DisplayTree::new(&store);
        apply_clicks(&mut tree, &store, &clicks);

        let visible = tree.visible();
        let id = visible[pick % visible.len()].id;
        if tree.state(id) != Some(ExpansionState::Expanded) {
            tree.toggle(id, &store).unwrap();
        }
        let before = tree.expanded_children(id).unwrap().to_vec();
        let records: Vec<_> = before.iter().map(|&c| tree.record_of(c).cloned()).collect();
        let render_ids: Vec<_> = before.iter().map(|&c| tree.render_id_or_assign(c)).collect();
        let len = tree.len();

        prop_assert_eq!(tree.toggle(id, &store).unwrap(), Toggle::Collapsed);
        prop_assert_eq!(tree.toggle(id, &store).unwrap(), Toggle::Expanded);

        let after = tree.expanded_children(id).unwrap().to_vec();
        prop_assert_eq!(&before, &after);
        let records_after: Vec<_> = after.iter().map(|&c| tree.record_of(c).cloned()).collect();
        prop_assert_eq!(records, records_after);
        let render_after: Vec<_> = after.iter().map(|&c| tree.render_id(c)).collect();
        prop_assert_eq!(render_ids, render_after);
        // Re-expansion never materializes again.
        prop_assert_eq!(len, tree.len());
    }
}
