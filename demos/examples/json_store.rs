// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Load a store and a view configuration from JSON, then drive the view with
//! raw pointer events.
//!
//! Run:
//! - `cargo run -p canopy_demos --example json_store`

use std::error::Error;

use canopy_render::SvgSurface;
use canopy_store::TreeStore;
use canopy_view::{ContainerId, Host, TreeView, ViewConfig, ViewEvent};
use kurbo::{Point, Size};
use tracing::info;
use tracing_subscriber::EnvFilter;

const TREE: &str = r#"{
  "1": { "id": 1, "tag": "s0", "type": "decision", "N": 40, "children_ids": [2, 3, 4] },
  "2": { "id": 2, "tag": "up", "type": "action", "N": 25, "Q": 3.14159, "children_ids": [5] },
  "3": { "id": 3, "tag": "down", "type": "action", "N": 10, "Q": -1.5, "children_ids": [] },
  "4": { "id": 4, "tag": "stay", "tt": "never expanded by the planner", "type": "action", "N": 5, "Q": 0.0 },
  "5": { "id": 5, "tag": "s1", "type": "decision", "N": 25, "children_ids": null }
}"#;

const CONFIG: &str = r#"{ "duration": 400, "fixed_height": null, "margins": { "bottom": 60 } }"#;

#[derive(Debug)]
struct Page {
    size: Size,
}

impl Host for Page {
    fn measure(&self, _: &ContainerId) -> Option<Size> {
        Some(self.size)
    }

    fn alert(&mut self, message: &str) {
        eprintln!("ALERT: {message}");
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let store = TreeStore::from_json("1", TREE)?;
    let config = ViewConfig::from_json(CONFIG)?;
    info!(records = store.len(), max_visits = store.stats().max_visits, "store loaded");

    let container = ContainerId::from("planner");
    let surface = SvgSurface::default();
    let page = Page {
        size: Size::new(800.0, 500.0),
    };
    let mut view = TreeView::new(store, container, &config, page, surface, 0)?;

    // Press and release on the root, in surface coordinates.
    let offset = view.bounds().offset;
    let root_at = Point::new(view.bounds().inner.width / 2.0, 0.0) + offset;
    let mut now = 1_000;
    for event in [
        ViewEvent::PointerDown {
            position: root_at,
            time: now,
        },
        ViewEvent::PointerUp {
            position: root_at,
            time: now + 80,
        },
    ] {
        if let Some(toggle) = view.handle(event)? {
            println!("pointer click: {toggle:?}");
        }
    }

    // The container shrinks; the tree re-lays out from the root.
    now += 1_000;
    view.host_mut().size = Size::new(500.0, 400.0);
    view.handle(ViewEvent::Resize { time: now })?;

    view.surface_mut().advance(now + config.duration);
    println!("{}", view.surface().to_svg(now + config.duration));
    Ok(())
}
