// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyed reconciliation of successive frames into animated render passes.

use alloc::vec::Vec;

use canopy_display::RenderId;
use hashbrown::{HashMap, HashSet};
use kurbo::{BezPath, CubicBez, Point, Rect, Size, Vec2};
use tracing::{debug, trace};

use crate::damage::Damage;
use crate::diagonal::{diagonal, diagonal_bounds, diagonal_path};
use crate::tween::{Transition, Tween};
use crate::visual::NodeVisual;

/// Radius and label opacity of an element that is not (yet) visible.
///
/// Not zero, so that scale-dependent renderers never divide by it.
pub const HIDDEN: f64 = 1e-6;

/// Default transition length in milliseconds.
pub const DEFAULT_DURATION: u64 = 750;

/// Default node radius.
pub const DEFAULT_RADIUS: f64 = 10.0;

/// One visible node of a freshly laid out frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameNode {
    /// Stable identity of the node.
    pub id: RenderId,
    /// Identity of the parent; `None` for the root. Keys the edge into this node.
    pub parent: Option<RenderId>,
    /// Layout position, in content coordinates.
    pub position: Point,
    /// Label, tooltip and fill.
    pub visual: NodeVisual,
    /// Stroke width of the edge from the parent.
    pub edge_width: f64,
}

/// The visible set after layout, ready to be reconciled.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    /// Declared surface size.
    pub size: Size,
    /// Offset of the content origin within the surface (the top-left margin).
    pub offset: Vec2,
    /// Nodes in visible order; parents precede children.
    pub nodes: Vec<FrameNode>,
}

/// Where the interaction that caused a pass happened.
///
/// Entering elements grow out of `prior`, the source node's position before the
/// pass. Exiting elements shrink into `current`, its position after layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceAnchor {
    /// Position of the source at the end of the previous pass.
    pub prior: Point,
    /// Position of the source in the new layout.
    pub current: Point,
}

/// How an element takes part in a pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// First appearance; grows out of the source anchor.
    Enter,
    /// Present before and after; moves to its new place.
    Update,
    /// No longer visible; shrinks into the source anchor, then is removed.
    Exit,
}

/// A node element and its transition for one pass.
#[derive(Clone, Debug)]
pub struct NodeOp {
    /// Stable identity.
    pub id: RenderId,
    /// Enter, update or exit.
    pub phase: Phase,
    /// Position of the node's origin.
    pub position: Tween<Point>,
    /// Circle radius.
    pub radius: Tween<f64>,
    /// Label fill opacity.
    pub label_opacity: Tween<f64>,
    /// Label, tooltip and fill.
    pub visual: NodeVisual,
}

impl NodeOp {
    /// Returns `true` once an exiting node's transition has finished.
    pub fn is_removed(&self, now: u64) -> bool {
        self.phase == Phase::Exit && self.position.transition.is_finished(now)
    }
}

/// An edge element, keyed by its child node, and its transition for one pass.
#[derive(Clone, Debug)]
pub struct EdgeOp {
    /// Identity of the child node.
    pub id: RenderId,
    /// Enter, update or exit.
    pub phase: Phase,
    /// Parent end.
    pub source: Tween<Point>,
    /// Child end.
    pub target: Tween<Point>,
    /// Stroke width.
    pub width: f64,
}

impl EdgeOp {
    /// The edge curve at `now`.
    pub fn curve(&self, now: u64) -> CubicBez {
        diagonal(self.source.sample(now), self.target.sample(now))
    }

    /// The edge curve at `now`, as a path.
    pub fn path(&self, now: u64) -> BezPath {
        diagonal_path(self.source.sample(now), self.target.sample(now))
    }

    /// Returns `true` once an exiting edge's transition has finished.
    pub fn is_removed(&self, now: u64) -> bool {
        self.phase == Phase::Exit && self.target.transition.is_finished(now)
    }
}

/// Everything a surface needs to apply one update.
#[derive(Clone, Debug, Default)]
pub struct RenderPass {
    /// Declared surface size.
    pub size: Size,
    /// Content offset within the surface.
    pub offset: Vec2,
    /// Node operations: entering and updating nodes in frame order, then exits.
    pub nodes: Vec<NodeOp>,
    /// Edge operations in the same order as their child nodes.
    pub edges: Vec<EdgeOp>,
    /// Regions touched by this pass.
    pub damage: Damage,
}

impl RenderPass {
    /// Operations in `phase`.
    pub fn nodes_in(&self, phase: Phase) -> impl Iterator<Item = &NodeOp> + '_ {
        self.nodes.iter().filter(move |op| op.phase == phase)
    }

    /// Edge operations in `phase`.
    pub fn edges_in(&self, phase: Phase) -> impl Iterator<Item = &EdgeOp> + '_ {
        self.edges.iter().filter(move |op| op.phase == phase)
    }
}

/// Retained element state, diffed against each new frame by [`RenderId`].
///
/// ## Example
///
/// ```rust
/// use canopy_display::RenderId;
/// use canopy_render::{FrameNode, Frame, Fill, NodeVisual, Phase, Scene, SourceAnchor};
/// use kurbo::Point;
///
/// let visual = NodeVisual { lines: vec!["root".into()], tooltip: String::new(), fill: Fill::Plain };
/// let node = |id, parent, x| FrameNode {
///     id: RenderId(id),
///     parent,
///     position: Point::new(x, 0.0),
///     visual: visual.clone(),
///     edge_width: 1.0,
/// };
/// let anchor = SourceAnchor { prior: Point::new(50.0, 0.0), current: Point::new(50.0, 0.0) };
///
/// let mut scene = Scene::new(750, 10.0);
/// let first = Frame { nodes: vec![node(1, None, 50.0)], ..Frame::default() };
/// let pass = scene.reconcile(&first, anchor, 0);
/// assert_eq!(pass.nodes[0].phase, Phase::Enter);
///
/// // The same identity in the next frame is an update, whatever its position.
/// let second = Frame { nodes: vec![node(1, None, 80.0)], ..Frame::default() };
/// let pass = scene.reconcile(&second, anchor, 1000);
/// assert_eq!(pass.nodes[0].phase, Phase::Update);
/// assert_eq!(pass.nodes[0].position.from, Point::new(50.0, 0.0));
/// ```
#[derive(Clone, Debug)]
pub struct Scene {
    duration: u64,
    radius: f64,
    nodes: HashMap<RenderId, NodeOp>,
    edges: HashMap<RenderId, EdgeOp>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION, DEFAULT_RADIUS)
    }
}

impl Scene {
    /// Create an empty scene whose transitions last `duration` milliseconds.
    pub fn new(duration: u64, radius: f64) -> Self {
        Self {
            duration,
            radius,
            nodes: HashMap::new(),
            edges: HashMap::new(),
        }
    }

    /// Transition length in milliseconds.
    pub fn duration(&self) -> u64 {
        self.duration
    }

    /// Radius of a fully shown node.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Diff `frame` against the retained elements and start this pass's transitions at `now`.
    ///
    /// - A node or edge not retained enters from `source.prior`.
    /// - A retained one (even if it was exiting) updates from wherever it is at `now`.
    /// - A retained one missing from `frame` exits toward `source.current`, and is
    ///   dropped once that transition ends.
    pub fn reconcile(&mut self, frame: &Frame, source: SourceAnchor, now: u64) -> RenderPass {
        self.prune(now);
        let transition = Transition::new(now, self.duration);
        let mut pass = RenderPass {
            size: frame.size,
            offset: frame.offset,
            ..RenderPass::default()
        };

        let positions: HashMap<RenderId, Point> =
            frame.nodes.iter().map(|n| (n.id, n.position)).collect();
        let mut seen = HashSet::with_capacity(frame.nodes.len());
        let mut seen_edges = HashSet::with_capacity(frame.nodes.len());

        for n in &frame.nodes {
            seen.insert(n.id);
            let op = match self.nodes.get(&n.id) {
                Some(prev) => NodeOp {
                    id: n.id,
                    phase: Phase::Update,
                    position: Tween::new(prev.position.sample(now), n.position, transition),
                    radius: Tween::new(prev.radius.sample(now), self.radius, transition),
                    label_opacity: Tween::new(prev.label_opacity.sample(now), 1.0, transition),
                    visual: n.visual.clone(),
                },
                None => NodeOp {
                    id: n.id,
                    phase: Phase::Enter,
                    position: Tween::new(source.prior, n.position, transition),
                    radius: Tween::new(HIDDEN, self.radius, transition),
                    label_opacity: Tween::new(HIDDEN, 1.0, transition),
                    visual: n.visual.clone(),
                },
            };
            pass.damage.add(self.node_bounds(&op));
            self.nodes.insert(n.id, op.clone());
            pass.nodes.push(op);

            let Some(parent_pos) = n.parent.and_then(|p| positions.get(&p).copied()) else {
                continue;
            };
            let edge = match self.edges.get(&n.id) {
                Some(prev) => EdgeOp {
                    id: n.id,
                    phase: Phase::Update,
                    source: Tween::new(prev.source.sample(now), parent_pos, transition),
                    target: Tween::new(prev.target.sample(now), n.position, transition),
                    width: n.edge_width,
                },
                None => EdgeOp {
                    id: n.id,
                    phase: Phase::Enter,
                    source: Tween::new(source.prior, parent_pos, transition),
                    target: Tween::new(source.prior, n.position, transition),
                    width: n.edge_width,
                },
            };
            pass.damage.add(edge_bounds(&edge));
            seen_edges.insert(n.id);
            self.edges.insert(n.id, edge.clone());
            pass.edges.push(edge);
        }

        let mut exiting: Vec<RenderId> = self
            .nodes
            .keys()
            .filter(|id| !seen.contains(*id))
            .copied()
            .collect();
        exiting.sort_unstable();
        for id in exiting {
            let Some(prev) = self.nodes.get_mut(&id) else {
                continue;
            };
            let op = NodeOp {
                id,
                phase: Phase::Exit,
                position: Tween::new(prev.position.sample(now), source.current, transition),
                radius: Tween::new(prev.radius.sample(now), HIDDEN, transition),
                label_opacity: Tween::new(prev.label_opacity.sample(now), HIDDEN, transition),
                visual: prev.visual.clone(),
            };
            *prev = op.clone();
            pass.damage.add(self.node_bounds(&op));
            pass.nodes.push(op);
        }

        let mut exiting_edges: Vec<RenderId> = self
            .edges
            .keys()
            .filter(|id| !seen_edges.contains(*id))
            .copied()
            .collect();
        exiting_edges.sort_unstable();
        for id in exiting_edges {
            let Some(prev) = self.edges.get_mut(&id) else {
                continue;
            };
            let op = EdgeOp {
                id,
                phase: Phase::Exit,
                source: Tween::new(prev.source.sample(now), source.current, transition),
                target: Tween::new(prev.target.sample(now), source.current, transition),
                width: prev.width,
            };
            *prev = op.clone();
            pass.damage.add(edge_bounds(&op));
            pass.edges.push(op);
        }

        debug!(
            enter = pass.nodes_in(Phase::Enter).count(),
            update = pass.nodes_in(Phase::Update).count(),
            exit = pass.nodes_in(Phase::Exit).count(),
            edges = pass.edges.len(),
            "render pass"
        );
        pass
    }

    /// Drop exited elements whose transition has finished by `now`. Returns how many were dropped.
    pub fn prune(&mut self, now: u64) -> usize {
        let before = self.nodes.len() + self.edges.len();
        self.nodes.retain(|_, op| !op.is_removed(now));
        self.edges.retain(|_, op| !op.is_removed(now));
        let dropped = before - self.nodes.len() - self.edges.len();
        if dropped > 0 {
            trace!(dropped, "pruned exited elements");
        }
        dropped
    }

    /// Returns `true` if `id` has a retained node element (including one still exiting).
    pub fn contains(&self, id: RenderId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of retained node elements.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no node element is retained.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The retained state of a node element.
    pub fn node(&self, id: RenderId) -> Option<&NodeOp> {
        self.nodes.get(&id)
    }

    /// The retained state of the edge into `id`.
    pub fn edge(&self, id: RenderId) -> Option<&EdgeOp> {
        self.edges.get(&id)
    }

    /// Animated position of a node at `now`.
    pub fn position_at(&self, id: RenderId, now: u64) -> Option<Point> {
        self.nodes.get(&id).map(|op| op.position.sample(now))
    }

    /// The non-exiting node whose circle at `now` contains `point`, nearest first.
    ///
    /// `point` is in content coordinates.
    pub fn node_at(&self, point: Point, now: u64) -> Option<RenderId> {
        self.nodes
            .values()
            .filter(|op| op.phase != Phase::Exit)
            .filter_map(|op| {
                let d = op.position.sample(now).distance(point);
                (d <= op.radius.sample(now).max(self.radius)).then_some((d, op.id))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
            .map(|(_, id)| id)
    }

    /// Returns `true` when every retained transition has finished by `now`.
    pub fn is_settled(&self, now: u64) -> bool {
        self.nodes
            .values()
            .all(|op| op.position.transition.is_finished(now))
            && self
                .edges
                .values()
                .all(|op| op.target.transition.is_finished(now))
    }

    fn node_bounds(&self, op: &NodeOp) -> Rect {
        let r = self.radius.max(op.radius.from);
        Rect::from_points(op.position.from, op.position.to).inflate(r, r)
    }
}

fn edge_bounds(op: &EdgeOp) -> Rect {
    let half = op.width / 2.0;
    diagonal_bounds(op.source.from, op.target.from)
        .union(diagonal_bounds(op.source.to, op.target.to))
        .inflate(half, half)
}
