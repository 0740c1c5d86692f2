//! # Drag & Resize Gestures
//!
//! Ephemeral per-gesture records and the transform math. A gesture exists
//! only between a pointer-down and the matching pointer-up/cancel for the
//! same pointer id; interleaved events from other pointers are ignored.
//!
//! Drag: final translate = origin translate + (pointer end - pointer
//! start). Only the start and end positions matter.
//!
//! Resize: directions containing `e`/`s` grow width/height by the pointer
//! delta; `w`/`n` shrink them and shift the translate by the same delta
//! on that axis, so the opposite edge stays anchored (the element's
//! visual origin is its untransformed top-left corner). Width and height
//! clamp at a configured minimum.

use crate::transform;
use loupe_common::ResizeDirection;
use loupe_dom::{Document, NodeId};

/// Live drag-translate gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub pointer_id: u32,
    pub node: NodeId,
    pub origin_x: f64,
    pub origin_y: f64,
    pub origin_translate: (f64, f64),
}

impl DragState {
    /// Capture the gesture origin from the element's current transform.
    pub fn begin(doc: &Document, node: NodeId, pointer_id: u32, x: f64, y: f64) -> Self {
        let origin_translate = doc
            .inline_style(node, "transform")
            .map(|t| transform::parse_translate(&t))
            .unwrap_or((0.0, 0.0));
        Self {
            pointer_id,
            node,
            origin_x: x,
            origin_y: y,
            origin_translate,
        }
    }

    /// Translate for the current pointer position.
    pub fn translate_at(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.origin_translate.0 + (x - self.origin_x),
            self.origin_translate.1 + (y - self.origin_y),
        )
    }
}

/// Live 8-direction resize gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeState {
    pub pointer_id: u32,
    pub node: NodeId,
    pub direction: ResizeDirection,
    pub origin_x: f64,
    pub origin_y: f64,
    pub origin_width: f64,
    pub origin_height: f64,
    pub origin_translate: (f64, f64),
}

/// Geometry produced by a resize step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeResult {
    pub width: f64,
    pub height: f64,
    pub translate: (f64, f64),
}

impl ResizeState {
    pub fn begin(
        doc: &Document,
        node: NodeId,
        direction: ResizeDirection,
        pointer_id: u32,
        x: f64,
        y: f64,
    ) -> Option<Self> {
        let rect = doc.rect(node)?;
        let origin_translate = doc
            .inline_style(node, "transform")
            .map(|t| transform::parse_translate(&t))
            .unwrap_or((0.0, 0.0));
        Some(Self {
            pointer_id,
            node,
            direction,
            origin_x: x,
            origin_y: y,
            origin_width: rect.width,
            origin_height: rect.height,
            origin_translate,
        })
    }

    /// Put the element's geometry back where the gesture found it
    /// (aborted gesture, nothing persists).
    pub fn restore_origin(&self, doc: &mut Document) {
        let w = format!("{}px", self.origin_width.round() as i64);
        let h = format!("{}px", self.origin_height.round() as i64);
        let _ = doc.set_inline_style(self.node, "width", &w);
        let _ = doc.set_inline_style(self.node, "height", &h);
        let current = doc.inline_style(self.node, "transform");
        let value = transform::with_translate(
            current.as_deref(),
            self.origin_translate.0,
            self.origin_translate.1,
        );
        let _ = doc.set_inline_style(self.node, "transform", &value);
    }

    /// Geometry for the current pointer position, clamped to `min_size`.
    pub fn geometry_at(&self, x: f64, y: f64, min_size: f64) -> ResizeResult {
        let dx = x - self.origin_x;
        let dy = y - self.origin_y;

        let mut width = self.origin_width;
        let mut height = self.origin_height;
        let (mut tx, mut ty) = self.origin_translate;

        if self.direction.has_east() {
            width = self.origin_width + dx;
        }
        if self.direction.has_south() {
            height = self.origin_height + dy;
        }
        if self.direction.has_west() {
            width = self.origin_width - dx;
            tx += dx;
        }
        if self.direction.has_north() {
            height = self.origin_height - dy;
            ty += dy;
        }

        ResizeResult {
            width: width.max(min_size),
            height: height.max(min_size),
            translate: (tx, ty),
        }
    }
}

/// The session's single active gesture, if any. Enforces the
/// single-writer rule: while a gesture is live, nothing else may touch
/// the selected element's transform or size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Drag(DragState),
    Resize(ResizeState),
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    /// The captured pointer id, when a gesture is live.
    pub fn pointer_id(&self) -> Option<u32> {
        match self {
            Gesture::Idle => None,
            Gesture::Drag(d) => Some(d.pointer_id),
            Gesture::Resize(r) => Some(r.pointer_id),
        }
    }
}
