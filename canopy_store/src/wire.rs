// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON wire format emitted by the planner's tree exporter.

use alloc::{collections::BTreeMap, string::String, vec::Vec};
use serde::Deserialize;

use crate::record::{NodeKind, RecordId, StoreRecord};
use crate::store::StoreError;

/// Identifiers arrive as either integers or strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Int(i64),
    Str(String),
}

impl From<WireId> for RecordId {
    fn from(id: WireId) -> Self {
        match id {
            WireId::Int(n) => Self::new(alloc::format!("{n}")),
            WireId::Str(s) => Self::from(s),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum WireKind {
    Decision,
    Action,
}

#[derive(Deserialize)]
struct WireRecord {
    id: WireId,
    #[serde(default)]
    tag: String,
    #[serde(default, rename = "tt")]
    tooltip: Option<String>,
    #[serde(rename = "type")]
    kind: WireKind,
    #[serde(default, rename = "N")]
    visits: u64,
    #[serde(default, rename = "Q")]
    value: Option<f64>,
    #[serde(default)]
    children_ids: Option<Vec<WireId>>,
}

impl WireRecord {
    fn into_record(self) -> Result<StoreRecord, StoreError> {
        let id = RecordId::from(self.id);
        let kind = match self.kind {
            WireKind::Decision => NodeKind::Decision,
            WireKind::Action => NodeKind::Action {
                value: self.value.ok_or_else(|| StoreError::MissingValue(id.clone()))?,
            },
        };
        Ok(StoreRecord {
            id,
            tag: self.tag,
            tooltip: self.tooltip,
            kind,
            visit_count: self.visits,
            child_ids: self
                .children_ids
                .unwrap_or_default()
                .into_iter()
                .map(RecordId::from)
                .collect(),
        })
    }
}

/// Parse the keyed JSON object into records, in key order.
///
/// The object keys only serve to make the document addressable; the `id` field is
/// authoritative.
pub(crate) fn parse_records(json: &str) -> Result<Vec<StoreRecord>, StoreError> {
    let doc: BTreeMap<String, WireRecord> =
        serde_json::from_str(json).map_err(StoreError::Json)?;
    doc.into_values().map(WireRecord::into_record).collect()
}
