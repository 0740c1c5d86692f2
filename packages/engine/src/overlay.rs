//! # Overlay Geometry
//!
//! Keeps the on-screen selection rectangle equal to the selected
//! element's bounding box for as long as the selection is connected.
//!
//! Re-measure triggers (selection change, window resize, scroll on a
//! relevant container, size change, tree mutation) all funnel into one
//! pending flag; the session performs at most one measurement per
//! animation frame no matter how many triggers fired. That coalescing is
//! the central performance invariant, since scroll and mutation events
//! arrive at high frequency.

use crate::selection::SelectionModel;
use loupe_common::Rect;
use loupe_dom::{Document, NodeId};

#[derive(Debug, Default)]
pub struct OverlayState {
    /// Last-measured bounding box of the selection, viewport coordinates.
    /// `None` whenever there is no connected selection.
    pub rect: Option<Rect>,

    /// One coalesced measurement pending for the next frame.
    measure_pending: bool,

    /// Scrollable ancestors of the current selection, computed once per
    /// selection change. Scroll events on anything else are ignored.
    scroll_ancestors: Vec<NodeId>,

    /// Document mutation generation observed at the last measurement.
    seen_generation: u64,
}

impl OverlayState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a re-measure; redundant requests coalesce.
    pub fn schedule_measure(&mut self) {
        self.measure_pending = true;
    }

    pub fn measure_pending(&self) -> bool {
        self.measure_pending
    }

    /// A new selection was installed: rebuild the scroll-ancestor set and
    /// schedule a measure for the next frame (never synchronously, so the
    /// tree has settled by the time we read geometry).
    pub fn on_selection_changed(&mut self, doc: &Document, selection: Option<&SelectionModel>) {
        self.scroll_ancestors = match selection {
            Some(sel) => scrollable_ancestors(doc, sel.selected),
            None => Vec::new(),
        };
        if selection.is_none() {
            self.rect = None;
        }
        self.schedule_measure();
    }

    /// Scroll notification: only containers that can move the selection
    /// matter.
    pub fn on_scroll(&mut self, node: NodeId) {
        if self.scroll_ancestors.contains(&node) {
            self.schedule_measure();
        }
    }

    /// Frame callback. Performs at most one measurement, consuming the
    /// pending flag; also picks up tree mutations that happened since the
    /// last look. Returns the new rect.
    pub fn run_frame(&mut self, doc: &Document, selection: Option<&SelectionModel>) -> Option<Rect> {
        let dirty = self.measure_pending || doc.mutation_generation() != self.seen_generation;
        if !dirty {
            return self.rect;
        }
        self.measure_pending = false;
        self.seen_generation = doc.mutation_generation();

        self.rect = match selection {
            Some(sel) if sel.is_connected(doc) => doc.rect(sel.selected),
            // Disconnected selection: inert, not an error
            _ => None,
        };
        self.rect
    }
}

/// Scrollable ancestors of `id` (excluding itself): overflow style allows
/// scrolling and the content actually overflows.
pub fn scrollable_ancestors(doc: &Document, id: NodeId) -> Vec<NodeId> {
    doc.ancestors_inclusive(id)
        .into_iter()
        .skip(1)
        .filter(|&a| doc.get(a).is_some_and(|n| n.layout.is_scroll_container()))
        .collect()
}

/// Nearest enclosing scroll container, excluding the node itself.
pub fn nearest_scroll_ancestor(doc: &Document, id: NodeId) -> Option<NodeId> {
    scrollable_ancestors(doc, id).into_iter().next()
}
