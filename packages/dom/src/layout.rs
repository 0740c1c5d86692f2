//! Per-node layout geometry, stamped by the renderer.
//!
//! Bounding rects are viewport coordinates (what the renderer reports from
//! its own measurement pass); client/scroll extents and overflow styling
//! are what we need to detect scroll containers without re-running layout.

use loupe_common::Rect;
use serde::{Deserialize, Serialize};

/// Computed overflow behavior for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
    Clip,
    Auto,
    Scroll,
    Overlay,
}

impl Overflow {
    /// Whether this overflow mode can produce a user-scrollable box.
    pub fn is_scrollable(&self) -> bool {
        matches!(self, Overflow::Auto | Overflow::Scroll | Overflow::Overlay)
    }
}

/// Renderer-reported geometry for one element.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Layout {
    /// Bounding box in viewport coordinates.
    pub rect: Rect,

    pub client_width: f64,
    pub client_height: f64,
    pub scroll_width: f64,
    pub scroll_height: f64,

    pub overflow_x: Overflow,
    pub overflow_y: Overflow,
}

impl Layout {
    /// Scrollable style on an axis AND actual content overflow on that axis.
    /// The one-pixel slack mirrors how renderers report fractional sizes.
    pub fn is_scroll_container(&self) -> bool {
        let x = self.overflow_x.is_scrollable() && self.scroll_width > self.client_width + 1.0;
        let y = self.overflow_y.is_scrollable() && self.scroll_height > self.client_height + 1.0;
        x || y
    }

    /// Vertical scrolling available.
    pub fn scrolls_vertically(&self) -> bool {
        self.overflow_y.is_scrollable() && self.scroll_height > self.client_height + 1.0
    }

    /// Horizontal scrolling available.
    pub fn scrolls_horizontally(&self) -> bool {
        self.overflow_x.is_scrollable() && self.scroll_width > self.client_width + 1.0
    }
}
