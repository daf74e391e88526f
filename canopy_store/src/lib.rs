// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Store: the read-only node store behind a search-tree view.
//!
//! A tree-search planner (for example MCTS with double progressive widening) emits
//! its tree as a flat mapping from node identifier to a [`StoreRecord`]. Decision
//! records are states; action records are state-action edges and carry a running
//! value estimate. Every record lists the identifiers of its children in order.
//!
//! The store is built once, before any view exists, and is never mutated afterwards.
//! Views hold non-owning [`RecordId`] references into it and look records up on demand,
//! so a very large tree costs nothing until somebody looks at it.
//!
//! ## Minimal example
//!
//! ```rust
//! use canopy_store::{NodeKind, TreeStore};
//!
//! let json = r#"{
//!     "root": {"id": "root", "tag": "s0", "type": "decision", "N": 5, "children_ids": ["a", "b"]},
//!     "a": {"id": "a", "tag": "left", "type": "action", "N": 3, "Q": 1.2, "children_ids": []},
//!     "b": {"id": "b", "tag": "right", "type": "action", "N": 2, "Q": -0.4}
//! }"#;
//!
//! let store = TreeStore::from_json("root", json).unwrap();
//! assert_eq!(store.len(), 3);
//! assert_eq!(store.stats().max_visits, 5);
//!
//! let a = store.get("a").unwrap();
//! assert_eq!(a.kind, NodeKind::Action { value: 1.2 });
//! assert_eq!(store.root_record().child_ids.len(), 2);
//! ```
//!
//! ## Input format
//!
//! [`TreeStore::from_json`] accepts a JSON object keyed by identifier. Identifiers (both `id`
//! and the entries of `children_ids`) may be JSON strings or integers; they are normalized to
//! strings. `tt` is an optional explicit tooltip, `N` the visit count, and `Q` the value of an
//! action record. `children_ids` may be absent or `null` for leaves.
//!
//! Dangling child identifiers are *not* rejected at load time. They are reported by the view
//! when (and if) the parent is expanded.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod record;
mod store;
mod wire;

pub use record::{NodeKind, RecordId, StoreRecord};
pub use store::{StoreError, StoreStats, TreeStore, ValueRange};
