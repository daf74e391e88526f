// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! What a view needs from the page that embeds it.

use alloc::string::String;
use core::fmt;

use kurbo::Size;

/// Handle of the element a view lives in.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(String);

impl ContainerId {
    /// Create a handle.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The handle as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContainerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ContainerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The embedding environment.
pub trait Host {
    /// Current size of `container`, or `None` if it does not exist.
    fn measure(&self, container: &ContainerId) -> Option<Size>;

    /// Show a blocking message to the user.
    fn alert(&mut self, message: &str);
}
