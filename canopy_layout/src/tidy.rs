// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Buchheim–Jünger–Leipert tidy tree layout, scaled into a box.

use alloc::{vec, vec::Vec};
use kurbo::{Point, Size};

use crate::hierarchy::Hierarchy;

/// Minimum breadth-axis distance between neighbouring nodes, in layout units.
///
/// Both values must be positive. Units are relative: the final layout is scaled to
/// fill the requested width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Separation {
    /// Between nodes that share a parent.
    pub siblings: f64,
    /// Between nodes with different parents.
    pub cousins: f64,
}

impl Default for Separation {
    fn default() -> Self {
        Self {
            siblings: 1.0,
            cousins: 2.0,
        }
    }
}

/// Tidy tree layout into a `size.width × size.height` box.
///
/// - Breadth axis (x): sibling subtrees never overlap, each parent is centered over
///   its first and last child, and children appear in hierarchy order.
/// - Depth axis (y): proportional to depth, with the deepest level at `size.height`.
///
/// The result is a pure function of the hierarchy and size.
///
/// ## Example
///
/// ```rust
/// use canopy_layout::{Hierarchy, TreeLayout};
/// use kurbo::{Point, Size};
///
/// let h = Hierarchy::from_parents([None, Some(0), Some(0)]).unwrap();
/// let layout = TreeLayout::new(Size::new(300.0, 100.0));
/// let pos = layout.compute(&h);
///
/// // The root is centered over its two children, which sit on the bottom edge.
/// assert_eq!(pos[0], Point::new(150.0, 0.0));
/// assert_eq!(pos[1].y, 100.0);
/// assert!(pos[1].x < pos[0].x && pos[0].x < pos[2].x);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreeLayout {
    /// Output box. Negative extents are treated as zero.
    pub size: Size,
    /// Neighbour separation.
    pub separation: Separation,
}

impl TreeLayout {
    /// Layout into `size` with default separation.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            separation: Separation::default(),
        }
    }

    /// Compute one position per hierarchy node, indexed like the hierarchy.
    pub fn compute(&self, h: &Hierarchy) -> Vec<Point> {
        let n = h.len();
        if n == 0 {
            return Vec::new();
        }
        let mut walk = Walk::new(h, self.separation);
        for v in post_order(h) {
            walk.first_walk(v);
        }
        let x = walk.second_walk();
        self.scale(h, &x)
    }

    fn scale(&self, h: &Hierarchy, x: &[f64]) -> Vec<Point> {
        let width = self.size.width.max(0.0);
        let height = self.size.height.max(0.0);

        let mut left = 0;
        let mut right = 0;
        for (i, &xi) in x.iter().enumerate() {
            if xi < x[left] {
                left = i;
            }
            if xi > x[right] {
                right = i;
            }
        }
        let sep = |a: usize, b: usize| separation(h, self.separation, a, b);
        let tx = sep(left, right) / 2.0 - x[left];
        let span = x[right] + sep(right, left) / 2.0 + tx;
        let kx = if span > 0.0 { width / span } else { 0.0 };
        let max_depth = h.max_depth();
        let ky = height / f64::from(max_depth.max(1));

        x.iter()
            .enumerate()
            .map(|(i, &xi)| {
                let px = if span > 0.0 { (xi + tx) * kx } else { width / 2.0 };
                let py = f64::from(h.depth(i)) * ky;
                // Guard against rounding past the box edges.
                Point::new(px.clamp(0.0, width), py.clamp(0.0, height))
            })
            .collect()
    }
}

fn separation(h: &Hierarchy, sep: Separation, a: usize, b: usize) -> f64 {
    if h.parent(a) == h.parent(b) {
        sep.siblings
    } else {
        sep.cousins
    }
}

/// Children before parents, siblings left to right.
fn post_order(h: &Hierarchy) -> Vec<usize> {
    let mut stack = vec![0];
    let mut pre = Vec::with_capacity(h.len());
    while let Some(v) = stack.pop() {
        pre.push(v);
        stack.extend_from_slice(h.children(v));
    }
    // `pre` visits the rightmost child first; reversed, it is a left-to-right post-order.
    pre.reverse();
    pre
}

/// Per-node working state of the walks.
struct Walk<'a> {
    h: &'a Hierarchy,
    sep: Separation,
    /// Preliminary x.
    prelim: Vec<f64>,
    /// Modifier applied to the whole subtree.
    modifier: Vec<f64>,
    change: Vec<f64>,
    shift: Vec<f64>,
    /// Contour thread for nodes without children.
    thread: Vec<Option<usize>>,
    ancestor: Vec<usize>,
    /// Default ancestor used while placing the children of each node.
    default_ancestor: Vec<Option<usize>>,
    /// Index among siblings.
    number: Vec<usize>,
}

impl<'a> Walk<'a> {
    fn new(h: &'a Hierarchy, sep: Separation) -> Self {
        let n = h.len();
        let mut number = vec![0; n];
        for v in 0..n {
            for (i, &c) in h.children(v).iter().enumerate() {
                number[c] = i;
            }
        }
        Self {
            h,
            sep,
            prelim: vec![0.0; n],
            modifier: vec![0.0; n],
            change: vec![0.0; n],
            shift: vec![0.0; n],
            thread: vec![None; n],
            ancestor: (0..n).collect(),
            default_ancestor: vec![None; n],
            number,
        }
    }

    fn sep(&self, a: usize, b: usize) -> f64 {
        separation(self.h, self.sep, a, b)
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        self.h.children(v).first().copied().or(self.thread[v])
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        self.h.children(v).last().copied().or(self.thread[v])
    }

    fn left_sibling(&self, v: usize) -> Option<usize> {
        let parent = self.h.parent(v)?;
        let i = self.number[v];
        (i > 0).then(|| self.h.children(parent)[i - 1])
    }

    fn first_walk(&mut self, v: usize) {
        let w = self.left_sibling(v);
        let children = self.h.children(v);
        if let (Some(&first), Some(&last)) = (children.first(), children.last()) {
            self.execute_shifts(v);
            let midpoint = (self.prelim[first] + self.prelim[last]) / 2.0;
            if let Some(w) = w {
                self.prelim[v] = self.prelim[w] + self.sep(v, w);
                self.modifier[v] = self.prelim[v] - midpoint;
            } else {
                self.prelim[v] = midpoint;
            }
        } else if let Some(w) = w {
            self.prelim[v] = self.prelim[w] + self.sep(v, w);
        }

        let Some(parent) = self.h.parent(v) else {
            return;
        };
        let leftmost = self.h.children(parent)[0];
        let current = self.default_ancestor[parent].unwrap_or(leftmost);
        self.default_ancestor[parent] = Some(self.apportion(v, w, current));
    }

    /// Push `v`'s subtree right until it clears everything to its left.
    fn apportion(&mut self, v: usize, w: Option<usize>, mut default_ancestor: usize) -> usize {
        let Some(w) = w else {
            return default_ancestor;
        };
        let parent = self.h.parent(v).unwrap_or(v);

        // inner/outer contours on the right (`vi*`, `vo*`) and left (`*m`) sides.
        let mut vip = v;
        let mut vop = v;
        let mut vim = w;
        let mut vom = self.h.children(parent)[0];
        let mut sip = self.modifier[vip];
        let mut sop = self.modifier[vop];
        let mut sim = self.modifier[vim];
        let mut som = self.modifier[vom];

        let (next_im, next_ip) = loop {
            let (nim, nip) = (self.next_right(vim), self.next_left(vip));
            let (Some(nim), Some(nip)) = (nim, nip) else {
                break (nim, nip);
            };
            vim = nim;
            vip = nip;
            let (Some(nom), Some(nop)) = (self.next_left(vom), self.next_right(vop)) else {
                break (None, None);
            };
            vom = nom;
            vop = nop;
            self.ancestor[vop] = v;

            let shift = self.prelim[vim] + sim - self.prelim[vip] - sip + self.sep(vim, vip);
            if shift > 0.0 {
                let wl = self.ancestor_of(vim, v, default_ancestor);
                self.move_subtree(wl, v, shift);
                sip += shift;
                sop += shift;
            }
            sim += self.modifier[vim];
            sip += self.modifier[vip];
            som += self.modifier[vom];
            sop += self.modifier[vop];
        };

        if let Some(nim) = next_im
            && self.next_right(vop).is_none()
        {
            self.thread[vop] = Some(nim);
            self.modifier[vop] += sim - sop;
        }
        if let Some(nip) = next_ip
            && self.next_left(vom).is_none()
        {
            self.thread[vom] = Some(nip);
            self.modifier[vom] += sip - som;
            default_ancestor = v;
        }
        default_ancestor
    }

    fn ancestor_of(&self, vim: usize, v: usize, default_ancestor: usize) -> usize {
        let a = self.ancestor[vim];
        if self.h.parent(a) == self.h.parent(v) {
            a
        } else {
            default_ancestor
        }
    }

    fn move_subtree(&mut self, wl: usize, wr: usize, shift: f64) {
        #[allow(
            clippy::cast_precision_loss,
            reason = "sibling counts are far below 2^52."
        )]
        let subtrees = self.number[wr].saturating_sub(self.number[wl]).max(1) as f64;
        let change = shift / subtrees;
        self.change[wr] -= change;
        self.shift[wr] += shift;
        self.change[wl] += change;
        self.prelim[wr] += shift;
        self.modifier[wr] += shift;
    }

    fn execute_shifts(&mut self, v: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        let h = self.h;
        for &w in h.children(v).iter().rev() {
            self.prelim[w] += shift;
            self.modifier[w] += shift;
            change += self.change[w];
            shift += self.shift[w] + change;
        }
    }

    /// Resolve modifiers top-down into final breadth coordinates, root at 0.
    fn second_walk(mut self) -> Vec<f64> {
        let n = self.h.len();
        let mut x = vec![0.0; n];
        // Parents precede children, so index order is a valid top-down order.
        self.modifier[0] -= self.prelim[0];
        for v in 1..n {
            let parent = self.h.parent(v).unwrap_or(0);
            x[v] = self.prelim[v] + self.modifier[parent];
            self.modifier[v] += self.modifier[parent];
        }
        x
    }
}
