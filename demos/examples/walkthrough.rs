// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Expand, collapse and re-expand the root of a three-node search tree.
//!
//! Prints the render pass of each step and an SVG snapshot once its transition
//! has finished. Set `RUST_LOG=debug` to see the view's own logging.
//!
//! Run:
//! - `cargo run -p canopy_demos --example walkthrough`

use std::error::Error;

use canopy_display::DisplayId;
use canopy_render::{Phase, RenderPass, SvgSurface};
use canopy_store::{StoreRecord, TreeStore};
use canopy_view::{ContainerId, Host, TreeView, ViewConfig};
use kurbo::Size;
use tracing_subscriber::EnvFilter;

/// A page with one fixed-size container that prints alerts.
#[derive(Debug)]
struct Page;

impl Host for Page {
    fn measure(&self, container: &ContainerId) -> Option<Size> {
        (container.as_str() == "treevis").then_some(Size::new(960.0, 720.0))
    }

    fn alert(&mut self, message: &str) {
        println!("ALERT: {message}");
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let store = TreeStore::new(
        "root",
        [
            StoreRecord::decision("root", "s0", 5).with_children(["a", "b", "missing"]),
            StoreRecord::action("a", "left", 3, 1.2),
            StoreRecord::action("b", "right", 2, -0.4),
        ],
    )?;

    let container = ContainerId::from("treevis");
    let surface = SvgSurface::default();
    let config = ViewConfig::default();
    let mut view = TreeView::new(store, container, &config, Page, surface, 0)?;
    let root = view.tree().root();
    report(&view, "initial", 0, config.duration);

    let steps: [(&str, DisplayId, u64); 3] = [
        ("expand", root, 1_000),
        ("collapse", root, 2_000),
        ("re-expand", root, 3_000),
    ];
    for (label, node, time) in steps {
        let toggle = view.click(node, time)?;
        println!("{label}: {toggle:?}");
        report(&view, label, time, config.duration);
    }
    Ok(())
}

fn report(view: &TreeView<Page, SvgSurface>, label: &str, time: u64, duration: u64) {
    let pass: &RenderPass = view.last_pass();
    println!(
        "[{label}] t={time}: enter={} update={} exit={} edges={} damage={:?}",
        pass.nodes_in(Phase::Enter).count(),
        pass.nodes_in(Phase::Update).count(),
        pass.nodes_in(Phase::Exit).count(),
        pass.edges.len(),
        pass.damage.union_rect(),
    );
    println!("{}", view.surface().to_svg(time + duration));
}
