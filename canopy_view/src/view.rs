// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The interaction controller: events in, render passes out.

use alloc::string::ToString;
use alloc::sync::Arc;
use alloc::vec::Vec;

use canopy_display::{DisplayError, DisplayId, DisplayTree, ExpansionState, RenderId, Toggle};
use canopy_layout::{Hierarchy, TreeLayout};
use canopy_render::{
    EdgeWeight, Frame, FrameNode, NodeVisual, RenderPass, Scene, SourceAnchor, Surface,
};
use canopy_store::TreeStore;
use hashbrown::HashMap;
use kurbo::Point;
use tracing::{debug, debug_span, trace};

use crate::click::{ClickResult, ClickState};
use crate::config::{ViewConfig, ViewContext};
use crate::error::ViewError;
use crate::host::{ContainerId, Host};
use crate::viewport::{Bounds, Viewport, surface_name};

/// Input delivered to a [`TreeView`].
///
/// Positions are in surface coordinates; times are milliseconds on the same clock
/// the view's transitions use.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewEvent {
    /// A node was clicked, already resolved by the host.
    Click {
        /// The clicked node.
        node: DisplayId,
        /// When.
        time: u64,
    },
    /// Primary pointer pressed.
    PointerDown {
        /// Where.
        position: Point,
        /// When.
        time: u64,
    },
    /// Primary pointer moved while pressed.
    PointerMove {
        /// Where.
        position: Point,
    },
    /// Primary pointer released.
    PointerUp {
        /// Where.
        position: Point,
        /// When.
        time: u64,
    },
    /// The container may have changed size.
    Resize {
        /// When.
        time: u64,
    },
}

/// An interactive, lazily expanded view of a [`TreeStore`].
///
/// Each click toggles one node and runs an update: measure the container, lay out
/// the visible set, reconcile it against what is on screen, and present the
/// resulting [`RenderPass`] to the surface. Nothing here is shared between views.
///
/// ## Example
///
/// ```rust
/// use canopy_render::{Phase, SvgSurface};
/// use canopy_store::{StoreRecord, TreeStore};
/// use canopy_view::{ContainerId, Host, TreeView, ViewConfig};
/// use kurbo::Size;
///
/// struct Page;
/// impl Host for Page {
///     fn measure(&self, _: &ContainerId) -> Option<Size> {
///         Some(Size::new(1000.0, 800.0))
///     }
///     fn alert(&mut self, message: &str) {
///         panic!("{message}");
///     }
/// }
///
/// let store = TreeStore::new(
///     "root",
///     [
///         StoreRecord::decision("root", "s0", 5).with_children(["a"]),
///         StoreRecord::action("a", "left", 3, 1.2),
///     ],
/// )
/// .unwrap();
///
/// let mut view = TreeView::new(store, "treevis", &ViewConfig::default(), Page, SvgSurface::default(), 0).unwrap();
/// assert_eq!(view.surface().name(), "treevis-canopy");
/// let root = view.tree().root();
/// view.click(root, 1000).unwrap();
/// assert_eq!(view.last_pass().nodes_in(Phase::Enter).count(), 1);
/// assert!(view.surface().to_svg(2000).contains("Q:1.200"));
/// ```
#[derive(Debug)]
pub struct TreeView<H, S> {
    store: Arc<TreeStore>,
    tree: DisplayTree,
    scene: Scene,
    host: H,
    surface: S,
    context: ViewContext,
    viewport: Viewport,
    weight: EdgeWeight,
    clicks: ClickState<DisplayId>,
    by_render: HashMap<RenderId, DisplayId>,
    bounds: Bounds,
    last_pass: RenderPass,
}

impl<H: Host, S: Surface> TreeView<H, S> {
    /// Build a view and render the root.
    ///
    /// The surface is attached under [`surface_name`] of `container` before the
    /// first pass.
    ///
    /// Fails with [`ViewError::ContainerNotFound`] if `host` cannot measure `container`.
    pub fn new(
        store: impl Into<Arc<TreeStore>>,
        container: impl Into<ContainerId>,
        config: &ViewConfig,
        host: H,
        mut surface: S,
        now: u64,
    ) -> Result<Self, ViewError> {
        let store = store.into();
        let context = ViewContext::new(container.into(), store.stats());
        let viewport = Viewport::new(config.margins, config.fixed_height);
        let bounds = viewport.measure(&host, &context.container)?;
        surface.attach(&surface_name(&context.container));

        let mut tree = DisplayTree::new(&store);
        let root = tree.root();
        tree.set_prior(root, Point::new(bounds.inner.width / 2.0, 0.0));
        debug!(container = %context.container, root = %store.root(), "initial render");

        let mut view = Self {
            weight: EdgeWeight::new(config.edge_scale, context.max_visits),
            store,
            tree,
            scene: Scene::new(config.duration, config.node_radius),
            host,
            surface,
            context,
            viewport,
            clicks: ClickState::with_thresholds(config.click_distance, config.click_time),
            by_render: HashMap::new(),
            bounds,
            last_pass: RenderPass::default(),
        };
        view.update(root, now)?;
        Ok(view)
    }

    /// Toggle `node` and update with it as the animation source.
    ///
    /// Child ids missing from the store are reported to the host, one alert each;
    /// the rest of the children still appear. Nodes hidden under a collapsed or
    /// unloaded ancestor are rejected with [`ViewError::Hidden`] and left unchanged.
    pub fn click(&mut self, node: DisplayId, now: u64) -> Result<Toggle, ViewError> {
        debug!(?node, "clicked");
        self.ensure_shown(node)?;
        let toggle = self.tree.toggle(node, &self.store)?;
        if let Toggle::Materialized(m) = &toggle {
            for broken in &m.broken {
                self.host.alert(&broken.to_string());
            }
        }
        self.update(node, now)?;
        Ok(toggle)
    }

    /// Collapse `node` and every expanded node below it, then update.
    pub fn collapse_subtree(&mut self, node: DisplayId, now: u64) -> Result<(), ViewError> {
        self.ensure_shown(node)?;
        self.tree.collapse_subtree(node)?;
        self.update(node, now)?;
        Ok(())
    }

    /// Dispatch one input event. Returns the toggle it caused, if any.
    pub fn handle(&mut self, event: ViewEvent) -> Result<Option<Toggle>, ViewError> {
        match event {
            ViewEvent::Click { node, time } => self.click(node, time).map(Some),
            ViewEvent::PointerDown { position, time } => {
                match self.node_at(position, time) {
                    Some(node) => self.clicks.on_down(node, position, time),
                    None => {
                        self.clicks.cancel();
                    }
                }
                Ok(None)
            }
            ViewEvent::PointerMove { position } => {
                if self.clicks.on_move(position) {
                    trace!("press turned into a drag");
                }
                Ok(None)
            }
            ViewEvent::PointerUp { position, time } => {
                let under = self.node_at(position, time);
                match self.clicks.on_up(under.as_ref(), position, time) {
                    ClickResult::Click(node) => self.click(node, time).map(Some),
                    ClickResult::Suppressed(_) => Ok(None),
                }
            }
            ViewEvent::Resize { time } => {
                let root = self.tree.root();
                self.update(root, time)?;
                Ok(None)
            }
        }
    }

    /// Re-measure, re-layout and reconcile, animating relative to `source`.
    pub fn update(&mut self, source: DisplayId, now: u64) -> Result<&RenderPass, ViewError> {
        let _span = debug_span!("update", ?source, now).entered();
        let bounds = self.viewport.measure(&self.host, &self.context.container)?;
        self.bounds = bounds;
        self.surface.resize(bounds.outer, bounds.offset);

        let visible = self.tree.visible();
        let hierarchy = Hierarchy::from_parents(visible.iter().map(|v| v.parent))?;
        let positions = TreeLayout::new(bounds.inner).compute(&hierarchy);

        let mut render_ids = Vec::with_capacity(visible.len());
        let mut nodes = Vec::with_capacity(visible.len());
        for (v, &position) in visible.iter().zip(&positions) {
            self.tree.set_position(v.id, position);
            let id = self
                .tree
                .render_id_or_assign(v.id)
                .ok_or(DisplayError::UnknownNode(v.id))?;
            render_ids.push(id);
            self.by_render.insert(id, v.id);

            let record_id = self
                .tree
                .record_of(v.id)
                .ok_or(DisplayError::UnknownNode(v.id))?;
            let record = self
                .store
                .get(record_id.as_str())
                .ok_or_else(|| DisplayError::MissingRecord(record_id.clone()))?;
            let state = self.tree.state(v.id).unwrap_or(ExpansionState::Unloaded);
            nodes.push(FrameNode {
                id,
                parent: v.parent.and_then(|p| render_ids.get(p).copied()),
                position,
                visual: NodeVisual::new(record, state),
                edge_width: self.weight.width(record.visit_count),
            });
        }

        let anchor = SourceAnchor {
            prior: self
                .tree
                .prior(source)
                .ok_or(DisplayError::UnknownNode(source))?,
            current: self
                .tree
                .position(source)
                .ok_or(DisplayError::UnknownNode(source))?,
        };
        let frame = Frame {
            size: bounds.outer,
            offset: bounds.offset,
            nodes,
        };
        let pass = self.scene.reconcile(&frame, anchor, now);
        self.surface.present(&pass);
        self.tree.stash_positions(visible.iter().map(|v| v.id));
        self.last_pass = pass;
        Ok(&self.last_pass)
    }

    fn ensure_shown(&self, node: DisplayId) -> Result<(), ViewError> {
        if !self.tree.contains(node) {
            return Err(DisplayError::UnknownNode(node).into());
        }
        if !self.tree.is_visible(node) {
            return Err(ViewError::Hidden(node));
        }
        Ok(())
    }

    /// The shown node under `position` (surface coordinates) at `now`.
    pub fn node_at(&self, position: Point, now: u64) -> Option<DisplayId> {
        let id = self.scene.node_at(position - self.bounds.offset, now)?;
        self.by_render.get(&id).copied()
    }

    /// The display tree.
    pub fn tree(&self) -> &DisplayTree {
        &self.tree
    }

    /// The backing store.
    pub fn store(&self) -> &TreeStore {
        &self.store
    }

    /// Retained render state.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The embedding host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The embedding host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The drawing surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The drawing surface, mutably.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Per-view context derived at construction.
    pub fn context(&self) -> &ViewContext {
        &self.context
    }

    /// Bounds used by the latest update.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// The render pass produced by the latest update.
    pub fn last_pass(&self) -> &RenderPass {
        &self.last_pass
    }
}
