//! Viewport probes: where a section ends up after its nav control is activated.
//!
//! DESIGN
//! ======
//! Whether activating `#id` actually shows the section depends on layout,
//! which a structural check cannot see. [`ViewportProbe`] is the seam for
//! that: a browser-driven probe reports real geometry, while [`MarkupProbe`]
//! derives it from the page snapshot (a section hidden from layout has an
//! empty box, anything else is scrolled to the top of the viewport).
//!
//! "In viewport" means partially visible: the section box and the viewport
//! share a positive area.

use serde::Serialize;

use crate::page::Page;

#[cfg(test)]
#[path = "probe_test.rs"]
mod tests;

pub const DEFAULT_VIEWPORT_WIDTH: f64 = 1280.0;
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 720.0;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    #[error("page `{page}` has no element `#{anchor}`")]
    NoSuchAnchor { page: String, anchor: String },
    #[error("probe failed: {0}")]
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn intersection_area(&self, other: &Rect) -> f64 {
        let w = (self.x + self.width).min(other.x + other.width) - self.x.max(other.x);
        let h = (self.y + self.height).min(other.y + other.height) - self.y.max(other.y);
        if w > 0.0 && h > 0.0 { w * h } else { 0.0 }
    }
}

/// Section box and viewport after an activation has settled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub section: Rect,
    pub viewport: Rect,
}

impl Placement {
    #[must_use]
    pub fn in_viewport(&self) -> bool {
        self.section.intersection_area(&self.viewport) > 0.0
    }
}

#[async_trait::async_trait]
pub trait ViewportProbe: Send + Sync {
    /// Activate the page's navigation control for `anchor` and report the settled placement.
    async fn activate(&self, page: &Page, anchor: &str) -> Result<Placement, ProbeError>;
}

/// Placement derived from markup alone.
#[derive(Debug, Clone, Copy)]
pub struct MarkupProbe {
    viewport: Rect,
}

impl MarkupProbe {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { viewport: Rect::new(0.0, 0.0, width, height) }
    }
}

impl Default for MarkupProbe {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT)
    }
}

#[async_trait::async_trait]
impl ViewportProbe for MarkupProbe {
    async fn activate(&self, page: &Page, anchor: &str) -> Result<Placement, ProbeError> {
        if !page.defines(anchor) {
            return Err(ProbeError::NoSuchAnchor { page: page.path.clone(), anchor: anchor.to_owned() });
        }
        let section = if page.is_hidden(anchor) {
            Rect::new(0.0, 0.0, 0.0, 0.0)
        } else {
            Rect::new(0.0, 0.0, self.viewport.width, self.viewport.height)
        };
        Ok(Placement { section, viewport: self.viewport })
    }
}
