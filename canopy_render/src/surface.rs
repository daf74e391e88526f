// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The seam between the render engine and whatever draws.

use kurbo::{Size, Vec2};

use crate::scene::RenderPass;

/// A drawing surface that applies render passes.
///
/// Every visual mutation of a view goes through this trait, so enter, update
/// and exit of one pass are applied together.
pub trait Surface {
    /// Bind the surface to the drawing element `name`, creating it if needed.
    ///
    /// A view calls this once, before its first pass, with a name scoped to its
    /// container. Attaching the name already in use keeps the existing element.
    fn attach(&mut self, name: &str);

    /// Declare the surface size and the offset of the content origin.
    ///
    /// Called before layout runs on each update.
    fn resize(&mut self, size: Size, offset: Vec2);

    /// Apply one render pass. Its transitions start at the times they carry.
    fn present(&mut self, pass: &RenderPass);
}
