// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained SVG surface.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use canopy_display::RenderId;
use hashbrown::HashMap;
use kurbo::{BezPath, PathEl, Point, Size, Vec2};

use crate::scene::{EdgeOp, NodeOp, RenderPass};
use crate::surface::Surface;

/// Vertical offset of the label below the node center.
const LABEL_OFFSET: f64 = 25.0;

/// A [`Surface`] that keeps its elements in memory and writes SVG snapshots.
///
/// Elements are keyed like the scene: a pass replaces an element's transition,
/// exited elements stay until their transition ends, and any instant can be
/// serialized with [`SvgSurface::to_svg`].
#[derive(Clone, Debug, Default)]
pub struct SvgSurface {
    name: String,
    size: Size,
    offset: Vec2,
    nodes: HashMap<RenderId, NodeOp>,
    edges: HashMap<RenderId, EdgeOp>,
    passes: usize,
}

impl SvgSurface {
    /// Create an empty surface; `name` becomes the `id` of the `<svg>` element.
    ///
    /// A view renames the surface through [`Surface::attach`], so an unnamed
    /// [`SvgSurface::default`] is usually enough.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: Size::ZERO,
            offset: Vec2::ZERO,
            nodes: HashMap::new(),
            edges: HashMap::new(),
            passes: 0,
        }
    }

    /// The element id of this surface.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Content offset.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Number of passes presented so far.
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Number of node elements currently in the document, exiting ones included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edge elements currently in the document, exiting ones included.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if the node element `id` is in the document.
    pub fn has_node(&self, id: RenderId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Remove elements whose exit transition has ended by `now`.
    pub fn advance(&mut self, now: u64) {
        self.nodes.retain(|_, op| !op.is_removed(now));
        self.edges.retain(|_, op| !op.is_removed(now));
    }

    /// Serialize the document as it looks at `now`.
    pub fn to_svg(&self, now: u64) -> String {
        Snapshot { surface: self, now }.to_string()
    }
}

impl Surface for SvgSurface {
    fn attach(&mut self, name: &str) {
        if self.name != name {
            self.name = name.to_string();
            self.nodes.clear();
            self.edges.clear();
        }
    }

    fn resize(&mut self, size: Size, offset: Vec2) {
        self.size = size;
        self.offset = offset;
    }

    fn present(&mut self, pass: &RenderPass) {
        self.size = pass.size;
        self.offset = pass.offset;
        for op in &pass.nodes {
            self.nodes.insert(op.id, op.clone());
        }
        for op in &pass.edges {
            self.edges.insert(op.id, op.clone());
        }
        self.passes += 1;
    }
}

struct Snapshot<'a> {
    surface: &'a SvgSurface,
    now: u64,
}

impl fmt::Display for Snapshot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.surface;
        let now = self.now;
        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" id="{}" width="{:.0}" height="{:.0}">"#,
            escape_xml(&s.name),
            s.size.width,
            s.size.height
        )?;
        writeln!(
            f,
            r#"  <g transform="translate({},{})">"#,
            s.offset.x, s.offset.y
        )?;

        // Links are drawn beneath nodes; both in identity order, which is creation order.
        let mut edges: Vec<_> = s.edges.values().filter(|op| !op.is_removed(now)).collect();
        edges.sort_unstable_by_key(|op| op.id);
        for op in edges {
            f.write_str(r#"    <path class="link" d=""#)?;
            write_path_data(f, &op.path(now))?;
            writeln!(f, r#"" stroke-width="{:.2}"/>"#, op.width)?;
        }

        let mut nodes: Vec<_> = s.nodes.values().filter(|op| !op.is_removed(now)).collect();
        nodes.sort_unstable_by_key(|op| op.id);
        for op in nodes {
            let p = op.position.sample(now);
            writeln!(
                f,
                r#"    <g class="node" transform="translate({:.2},{:.2})">"#,
                p.x, p.y
            )?;
            writeln!(
                f,
                r#"      <circle r="{:.6}" style="fill: {};"/>"#,
                op.radius.sample(now),
                op.visual.fill.css()
            )?;
            write!(
                f,
                r#"      <text y="{LABEL_OFFSET}" text-anchor="middle" style="fill-opacity: {:.6};">"#,
                op.label_opacity.sample(now)
            )?;
            for (i, line) in op.visual.lines.iter().enumerate() {
                if i == 0 {
                    write!(f, "<tspan>{}</tspan>", escape_xml(line))?;
                } else {
                    write!(f, r#"<tspan dy="1.2em" x="0">{}</tspan>"#, escape_xml(line))?;
                }
            }
            f.write_str("</text>\n")?;
            writeln!(f, "      <title>{}</title>", escape_xml(&op.visual.tooltip))?;
            f.write_str("    </g>\n")?;
        }
        f.write_str("  </g>\n</svg>\n")
    }
}

fn write_path_data(f: &mut fmt::Formatter<'_>, path: &BezPath) -> fmt::Result {
    let pt = |p: Point| (p.x, p.y);
    for (i, el) in path.elements().iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        match *el {
            PathEl::MoveTo(p) => {
                let (x, y) = pt(p);
                write!(f, "M{x:.2},{y:.2}")?;
            }
            PathEl::LineTo(p) => {
                let (x, y) = pt(p);
                write!(f, "L{x:.2},{y:.2}")?;
            }
            PathEl::QuadTo(p1, p2) => {
                let ((x1, y1), (x2, y2)) = (pt(p1), pt(p2));
                write!(f, "Q{x1:.2},{y1:.2} {x2:.2},{y2:.2}")?;
            }
            PathEl::CurveTo(p1, p2, p3) => {
                let ((x1, y1), (x2, y2), (x3, y3)) = (pt(p1), pt(p2), pt(p3));
                write!(f, "C{x1:.2},{y1:.2} {x2:.2},{y2:.2} {x3:.2},{y3:.2}")?;
            }
            PathEl::ClosePath => f.write_str("Z")?,
        }
    }
    Ok(())
}

fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
