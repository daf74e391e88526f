// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Container measurement and margins.

use alloc::{format, string::String};

use kurbo::{Size, Vec2};
use tracing::trace;

use crate::config::Margins;
use crate::error::ViewError;
use crate::host::{ContainerId, Host};

/// Drawing bounds for one update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    /// Area the layout fills.
    pub inner: Size,
    /// Declared surface size: the inner area plus margins.
    pub outer: Size,
    /// Where the inner area starts within the surface.
    pub offset: Vec2,
}

/// Turns a container measurement into layout and surface bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Margins subtracted from the container.
    pub margins: Margins,
    /// Height used instead of the measured one, when set.
    pub fixed_height: Option<f64>,
}

impl Viewport {
    /// Create a viewport.
    pub fn new(margins: Margins, fixed_height: Option<f64>) -> Self {
        Self {
            margins,
            fixed_height,
        }
    }

    /// Bounds for a container of `size`.
    pub fn bounds(&self, size: Size) -> Bounds {
        let m = self.margins;
        let height = self.fixed_height.unwrap_or(size.height);
        let inner = Size::new(
            (size.width - m.left - m.right).max(0.0),
            (height - m.top - m.bottom).max(0.0),
        );
        Bounds {
            inner,
            outer: Size::new(
                inner.width + m.left + m.right,
                inner.height + m.top + m.bottom,
            ),
            offset: Vec2::new(m.left, m.top),
        }
    }

    /// Measure `container` through `host` and derive bounds.
    pub fn measure<H: Host + ?Sized>(
        &self,
        host: &H,
        container: &ContainerId,
    ) -> Result<Bounds, ViewError> {
        let size = host
            .measure(container)
            .ok_or_else(|| ViewError::ContainerNotFound(container.clone()))?;
        let bounds = self.bounds(size);
        trace!(%container, width = bounds.inner.width, height = bounds.inner.height, "measured");
        Ok(bounds)
    }
}

/// Name of the drawing surface a view creates inside `container`.
pub fn surface_name(container: &ContainerId) -> String {
    format!("{container}-canopy")
}
