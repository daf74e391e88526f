// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The store itself and the statistics derived from it at load time.

use hashbrown::HashMap;

use crate::record::{RecordId, StoreRecord};
use crate::wire::parse_records;

/// Errors raised while building a [`TreeStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The designated root is not one of the records.
    #[error("root node id {0} is not in the tree data")]
    MissingRoot(RecordId),
    /// Two records share an identifier.
    #[error("duplicate node id {0} in the tree data")]
    DuplicateId(RecordId),
    /// An action record has no value estimate.
    #[error("action node {0} has no Q value")]
    MissingValue(RecordId),
    /// The JSON document could not be parsed.
    #[error("malformed tree data: {0}")]
    Json(serde_json::Error),
}

/// Inclusive range of action values seen in the store.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueRange {
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
}

/// Statistics computed once when the store is built.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StoreStats {
    /// Largest visit count over every record. Drives edge-weight scaling.
    pub max_visits: u64,
    /// Range of action values, `None` when there are no action records.
    pub value_range: Option<ValueRange>,
}

impl StoreStats {
    fn observe(&mut self, record: &StoreRecord) {
        self.max_visits = self.max_visits.max(record.visit_count);
        if let Some(v) = record.kind.value() {
            self.value_range = Some(match self.value_range {
                None => ValueRange { min: v, max: v },
                Some(r) => ValueRange {
                    min: r.min.min(v),
                    max: r.max.max(v),
                },
            });
        }
    }
}

/// Immutable mapping from [`RecordId`] to [`StoreRecord`] with a designated root.
///
/// ## Example
///
/// ```rust
/// use canopy_store::{StoreRecord, TreeStore};
///
/// let store = TreeStore::new(
///     "s",
///     [
///         StoreRecord::decision("s", "start", 10).with_children(["a"]),
///         StoreRecord::action("a", "move", 10, 0.25),
///     ],
/// )
/// .unwrap();
///
/// assert_eq!(store.root().as_str(), "s");
/// assert!(store.contains("a"));
/// assert!(store.get("missing").is_none());
/// ```
#[derive(Debug)]
pub struct TreeStore {
    records: HashMap<RecordId, StoreRecord>,
    root: RecordId,
    stats: StoreStats,
}

impl TreeStore {
    /// Build a store from records.
    ///
    /// Fails if `root` is not among the records or if an identifier repeats.
    pub fn new(
        root: impl Into<RecordId>,
        records: impl IntoIterator<Item = StoreRecord>,
    ) -> Result<Self, StoreError> {
        let root = root.into();
        let mut map = HashMap::new();
        let mut stats = StoreStats::default();
        for record in records {
            stats.observe(&record);
            let id = record.id.clone();
            if map.insert(id.clone(), record).is_some() {
                return Err(StoreError::DuplicateId(id));
            }
        }
        if !map.contains_key(&root) {
            return Err(StoreError::MissingRoot(root));
        }
        Ok(Self {
            records: map,
            root,
            stats,
        })
    }

    /// Build a store from the keyed JSON document described in the crate docs.
    pub fn from_json(root: impl Into<RecordId>, json: &str) -> Result<Self, StoreError> {
        Self::new(root, parse_records(json)?)
    }

    /// Look up a record.
    pub fn get(&self, id: &str) -> Option<&StoreRecord> {
        self.records.get(id)
    }

    /// Returns `true` if a record with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// The designated root identifier.
    pub fn root(&self) -> &RecordId {
        &self.root
    }

    /// The root record.
    pub fn root_record(&self) -> &StoreRecord {
        // Checked in `new`, and the map is never mutated afterwards.
        &self.records[&self.root]
    }

    /// Load-time statistics.
    pub fn stats(&self) -> &StoreStats {
        &self.stats
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the store has no records. Never true for a constructed store.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate all records in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &StoreRecord> + '_ {
        self.records.values()
    }
}
