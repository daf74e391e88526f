// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! View configuration and the per-view context derived from the store.

use canopy_render::{DEFAULT_DURATION, DEFAULT_RADIUS, EdgeWeight};
use canopy_store::{StoreStats, ValueRange};
use serde::Deserialize;

use crate::click::{DEFAULT_DISTANCE, DEFAULT_TIME};
use crate::host::ContainerId;

/// Space kept free around the tree, in surface units.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Margins {
    /// Above the root.
    pub top: f64,
    /// Right of the rightmost node.
    pub right: f64,
    /// Below the deepest level, leaving room for labels.
    pub bottom: f64,
    /// Left of the leftmost node.
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 120.0,
            bottom: 80.0,
            left: 120.0,
        }
    }
}

/// Tunables of a [`TreeView`](crate::TreeView).
///
/// Every field has a default, so a host may pass a partial JSON object:
///
/// ```
/// use canopy_view::ViewConfig;
///
/// let config = ViewConfig::from_json(r#"{ "duration": 300, "margins": { "top": 40 } }"#).unwrap();
/// assert_eq!(config.duration, 300);
/// assert_eq!(config.margins.top, 40.0);
/// assert_eq!(config.margins.left, 120.0);
/// assert_eq!(config.fixed_height, Some(600.0));
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Margins around the drawing area.
    pub margins: Margins,
    /// Surface height to use instead of the container's measured height.
    pub fixed_height: Option<f64>,
    /// Transition length in milliseconds.
    pub duration: u64,
    /// Radius of a node circle.
    pub node_radius: f64,
    /// Edge stroke scale (see [`EdgeWeight`]).
    pub edge_scale: f64,
    /// Pointer travel tolerance for clicks on moving nodes; `None` is unlimited.
    pub click_distance: Option<f64>,
    /// Press duration tolerance for clicks on moving nodes, in milliseconds; `None` is unlimited.
    pub click_time: Option<u64>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            margins: Margins::default(),
            fixed_height: Some(600.0),
            duration: DEFAULT_DURATION,
            node_radius: DEFAULT_RADIUS,
            edge_scale: EdgeWeight::DEFAULT_SCALE,
            click_distance: Some(DEFAULT_DISTANCE),
            click_time: Some(DEFAULT_TIME),
        }
    }
}

impl ViewConfig {
    /// Parse a configuration, filling absent fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Everything a view needs that would otherwise be global state.
///
/// Built once at construction, so several views over different stores can share a page.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewContext {
    /// The container the view measures and draws into.
    pub container: ContainerId,
    /// Largest visit count in the whole store; scales edge widths.
    pub max_visits: u64,
    /// Range of action values in the store. Informational; styling does not use it.
    pub value_range: Option<ValueRange>,
}

impl ViewContext {
    /// Derive the context for `container` from load-time store statistics.
    pub fn new(container: ContainerId, stats: &StoreStats) -> Self {
        Self {
            container,
            max_visits: stats.max_visits,
            value_range: stats.value_range,
        }
    }
}
