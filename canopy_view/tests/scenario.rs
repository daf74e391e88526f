// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end behaviour of a view over small stores.

use canopy_display::{DisplayError, DisplayTree, ExpansionState, Materialized, Toggle};
use canopy_render::{Phase, SvgSurface};
use canopy_store::{RecordId, StoreRecord, TreeStore};
use canopy_view::{ContainerId, Host, TreeView, ViewConfig, ViewError, ViewEvent};
use kurbo::{Point, Size, Vec2};

#[derive(Debug, Default)]
struct Page {
    size: Option<Size>,
    alerts: Vec<String>,
}

impl Page {
    fn sized(width: f64, height: f64) -> Self {
        Self {
            size: Some(Size::new(width, height)),
            alerts: Vec::new(),
        }
    }
}

impl Host for Page {
    fn measure(&self, container: &ContainerId) -> Option<Size> {
        (container.as_str() == "treevis").then_some(self.size).flatten()
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_owned());
    }
}

fn scenario() -> TreeStore {
    TreeStore::new(
        "root",
        [
            StoreRecord::decision("root", "root", 5).with_children(["a", "b"]),
            StoreRecord::action("a", "a", 3, 1.2),
            StoreRecord::action("b", "b", 2, -0.4),
        ],
    )
    .unwrap()
}

fn view(store: TreeStore) -> TreeView<Page, SvgSurface> {
    TreeView::new(
        store,
        "treevis",
        &ViewConfig::default(),
        Page::sized(1000.0, 900.0),
        SvgSurface::default(),
        0,
    )
    .unwrap()
}

fn record_ids(view: &TreeView<Page, SvgSurface>) -> Vec<RecordId> {
    let tree = view.tree();
    tree.expanded_children(tree.root())
        .unwrap()
        .iter()
        .map(|&c| tree.record_of(c).unwrap().clone())
        .collect()
}

#[test]
fn initial_render_shows_only_the_root() {
    let v = view(scenario());
    let pass = v.last_pass();
    assert_eq!(pass.nodes.len(), 1);
    assert_eq!(pass.nodes[0].phase, Phase::Enter);
    // Default margins and fixed height: 1000 × 600 surface, 760 × 500 inner area.
    assert_eq!(pass.size, Size::new(1000.0, 600.0));
    assert_eq!(pass.offset, Vec2::new(120.0, 20.0));
    assert_eq!(pass.nodes[0].position.from, Point::new(380.0, 0.0));
    assert_eq!(pass.nodes[0].position.to, Point::new(380.0, 0.0));
    assert_eq!(v.tree().state(v.tree().root()), Some(ExpansionState::Unloaded));
    assert_eq!(v.surface().name(), "treevis-canopy");
    assert_eq!(v.context().max_visits, 5);
}

#[test]
fn expand_collapse_expand() {
    let mut v = view(scenario());
    let root = v.tree().root();

    // First click materializes.
    let toggle = v.click(root, 1000).unwrap();
    assert_eq!(toggle, Toggle::Materialized(Materialized::default()));
    assert_eq!(record_ids(&v), [RecordId::from("a"), RecordId::from("b")]);
    let pass = v.last_pass();
    let entered: Vec<_> = pass.nodes_in(Phase::Enter).collect();
    assert_eq!(entered.len(), 2);
    for op in &entered {
        assert_eq!(op.position.from, Point::new(380.0, 0.0));
    }
    assert_eq!(entered[0].position.to, Point::new(190.0, 500.0));
    assert_eq!(entered[1].position.to, Point::new(570.0, 500.0));
    let widths: Vec<_> = pass.edges.iter().map(|e| e.width).collect();
    assert_eq!(widths.len(), 2);
    assert!(widths[0] > widths[1], "more visits, thicker edge: {widths:?}");
    let first_ids: Vec<_> = entered.iter().map(|op| op.id).collect();

    // Second click collapses; children exit into the root but stay in memory.
    assert_eq!(v.click(root, 2000).unwrap(), Toggle::Collapsed);
    let exits: Vec<_> = v.last_pass().nodes_in(Phase::Exit).collect();
    assert_eq!(exits.len(), 2);
    for op in &exits {
        assert_eq!(op.position.to, Point::new(380.0, 0.0));
    }
    assert_eq!(v.tree().len(), 3);
    assert_eq!(v.surface().to_svg(2400).matches("<circle").count(), 3);
    assert_eq!(v.surface().to_svg(2750).matches("<circle").count(), 1);

    // Third click restores the cached children in order, with the same identities.
    assert_eq!(v.click(root, 3000).unwrap(), Toggle::Expanded);
    assert_eq!(v.tree().len(), 3);
    assert_eq!(record_ids(&v), [RecordId::from("a"), RecordId::from("b")]);
    let again: Vec<_> = v.last_pass().nodes_in(Phase::Enter).map(|op| op.id).collect();
    assert_eq!(again, first_ids);
    assert!(v.host().alerts.is_empty());
}

#[test]
fn broken_reference_alerts_once_and_keeps_siblings() {
    let store = TreeStore::new(
        "p",
        [
            StoreRecord::decision("p", "p", 1).with_children(["ok", "ghost"]),
            StoreRecord::decision("ok", "ok", 1),
        ],
    )
    .unwrap();
    let mut v = view(store);
    let root = v.tree().root();
    let Toggle::Materialized(m) = v.click(root, 10).unwrap() else {
        panic!("expected materialization");
    };
    assert_eq!(m.broken.len(), 1);
    assert_eq!(v.host().alerts, ["bad node id: ghost (in node p)"]);
    assert_eq!(record_ids(&v), [RecordId::from("ok")]);

    // Collapsing and re-expanding does not alert again.
    v.click(root, 20).unwrap();
    v.click(root, 30).unwrap();
    assert_eq!(v.host().alerts.len(), 1);
}

#[test]
fn missing_container_aborts_construction_and_updates() {
    let err = TreeView::new(
        scenario(),
        "elsewhere",
        &ViewConfig::default(),
        Page::sized(800.0, 600.0),
        SvgSurface::new("x"),
        0,
    )
    .unwrap_err();
    assert!(matches!(err, ViewError::ContainerNotFound(ref c) if c.as_str() == "elsewhere"));
    assert_eq!(err.to_string(), "container `elsewhere` not found");

    let mut v = view(scenario());
    v.host_mut().size = None;
    let root = v.tree().root();
    assert!(matches!(
        v.handle(ViewEvent::Resize { time: 5 }),
        Err(ViewError::ContainerNotFound(_))
    ));
    // The toggle itself happened before the failed update.
    assert!(v.click(root, 10).is_err());
    assert_eq!(v.tree().state(root), Some(ExpansionState::Expanded));
}

#[test]
fn resize_relayouts_from_the_root() {
    let mut v = view(scenario());
    let root = v.tree().root();
    v.click(root, 0).unwrap();
    v.host_mut().size = Some(Size::new(600.0, 900.0));
    assert_eq!(v.handle(ViewEvent::Resize { time: 1000 }).unwrap(), None);
    let pass = v.last_pass();
    assert_eq!(pass.size, Size::new(600.0, 600.0));
    assert_eq!(pass.nodes_in(Phase::Update).count(), 3);
    assert_eq!(pass.nodes_in(Phase::Enter).count(), 0);
    // Inner width is now 360: root moves to its center.
    assert_eq!(pass.nodes[0].position.to, Point::new(180.0, 0.0));
    assert_eq!(v.bounds().inner, Size::new(360.0, 500.0));
}

#[test]
fn pointer_click_follows_a_moving_node() {
    let mut v = view(scenario());
    let root = v.tree().root();
    v.click(root, 1000).unwrap();
    let a = v.tree().expanded_children(root).unwrap()[0];

    // Halfway through the transition `a` is at (285, 250) in content space.
    let down = Point::new(285.0 + 120.0, 250.0 + 20.0);
    assert_eq!(v.node_at(down, 1375), Some(a));
    assert_eq!(
        v.handle(ViewEvent::PointerDown {
            position: down,
            time: 1375
        })
        .unwrap(),
        None
    );
    // By release the node has moved on, but the pointer barely did.
    let up = down + Vec2::new(2.0, 1.0);
    let toggle = v
        .handle(ViewEvent::PointerUp {
            position: up,
            time: 1450,
        })
        .unwrap();
    assert_eq!(toggle, Some(Toggle::Materialized(Materialized::default())));
    assert_eq!(v.tree().state(a), Some(ExpansionState::Expanded));
}

#[test]
fn dragging_off_a_node_does_not_click() {
    let mut v = view(scenario());
    let root = v.tree().root();
    let at_root = Point::new(380.0 + 120.0, 20.0);
    v.handle(ViewEvent::PointerDown {
        position: at_root,
        time: 1000,
    })
    .unwrap();
    v.handle(ViewEvent::PointerMove {
        position: at_root + Vec2::new(40.0, 0.0),
    })
    .unwrap();
    let toggle = v
        .handle(ViewEvent::PointerUp {
            position: at_root + Vec2::new(40.0, 0.0),
            time: 1050,
        })
        .unwrap();
    assert_eq!(toggle, None);
    assert_eq!(v.tree().state(root), Some(ExpansionState::Unloaded));

    // A plain press and release on the root does.
    v.handle(ViewEvent::PointerDown {
        position: at_root,
        time: 2000,
    })
    .unwrap();
    let toggle = v
        .handle(ViewEvent::PointerUp {
            position: at_root,
            time: 2050,
        })
        .unwrap();
    assert!(matches!(toggle, Some(Toggle::Materialized(_))));
}

#[test]
fn clicks_on_hidden_nodes_are_rejected() {
    let mut v = view(scenario());
    let root = v.tree().root();
    v.click(root, 0).unwrap();
    let a = v.tree().expanded_children(root).unwrap()[0];
    v.click(root, 1000).unwrap();
    let passes = v.surface().passes();

    // `a` is still materialized but hidden under the collapsed root.
    assert!(matches!(
        v.handle(ViewEvent::Click { node: a, time: 2000 }),
        Err(ViewError::Hidden(n)) if n == a
    ));
    assert!(matches!(v.collapse_subtree(a, 2000), Err(ViewError::Hidden(_))));
    assert_eq!(v.tree().state(a), Some(ExpansionState::Unloaded));
    assert_eq!(v.surface().passes(), passes);

    // An id beyond this view's tree is unknown rather than hidden.
    let wide = TreeStore::new(
        "r",
        [
            StoreRecord::decision("r", "r", 1).with_children(["1", "2", "3", "4"]),
            StoreRecord::decision("1", "1", 1),
            StoreRecord::decision("2", "2", 1),
            StoreRecord::decision("3", "3", 1),
            StoreRecord::decision("4", "4", 1),
        ],
    )
    .unwrap();
    let mut other = DisplayTree::new(&wide);
    let other_root = other.root();
    other.toggle(other_root, &wide).unwrap();
    let stray = other.expanded_children(other_root).unwrap()[3];
    assert!(!v.tree().contains(stray));
    assert!(matches!(
        v.click(stray, 2000),
        Err(ViewError::Display(DisplayError::UnknownNode(_)))
    ));
}

#[test]
fn collapse_subtree_hides_everything_below() {
    let mut v = view(scenario());
    let root = v.tree().root();
    v.click(root, 0).unwrap();
    let a = v.tree().expanded_children(root).unwrap()[0];
    v.click(a, 10).unwrap();
    v.collapse_subtree(root, 20).unwrap();
    assert_eq!(v.tree().state(root), Some(ExpansionState::Collapsed));
    assert_eq!(v.tree().state(a), Some(ExpansionState::Collapsed));
    assert_eq!(v.last_pass().nodes_in(Phase::Exit).count(), 2);
}
