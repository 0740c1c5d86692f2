//! # Editor Session
//!
//! One session per editing surface, with an explicit open/close
//! lifecycle. The session owns the rendered tree, the selection, the
//! overlay geometry, the single active gesture, the text-edit state and
//! the preview set, and it is the only writer of any of them. Every
//! event handler goes through the methods here, so there are no shared
//! mutable cells to race.
//!
//! Outbound messages accumulate in an outbox the host drains after each
//! call; inbound work is always processed to completion before the next
//! call can begin (single-threaded, no reentrancy).

use crate::config::EngineConfig;
use crate::context::element_context;
use crate::events::{Key, KeyEvent, PointerEvent};
use crate::gestures::{DragState, Gesture, ResizeState};
use crate::groups::{effective_mode, SelectionMode};
use crate::hit_test::hit_test;
use crate::overlay::OverlayState;
use crate::preview::PreviewSet;
use crate::selection::SelectionModel;
use crate::text_edit::{EditOutcome, TextEditState};
use crate::transform;
use loupe_common::{Rect, ResizeDirection, SourceLocator};
use loupe_dom::{Document, NodeId, Selector};
use loupe_protocol::{HostMessage, SurfaceMessage, TargetInfo};
use std::collections::{HashMap, VecDeque};

/// Nudge persistence waiting out its quiet window.
#[derive(Debug, Clone, PartialEq)]
struct PendingNudge {
    node: NodeId,
    locator: Option<SourceLocator>,
    deadline_ms: u64,
}

/// The live selection & manipulation engine for one surface.
pub struct EditorSession {
    config: EngineConfig,
    doc: Document,
    mode: SelectionMode,
    selection: Option<SelectionModel>,
    overlay: OverlayState,
    gesture: Gesture,
    text_edit: TextEditState,
    previews: PreviewSet,
    pending_nudge: Option<PendingNudge>,
    now_ms: u64,
    outbox: VecDeque<SurfaceMessage>,
    open: bool,
}

impl EditorSession {
    pub fn new(config: EngineConfig) -> Self {
        let mode = config.selection_mode;
        Self {
            config,
            doc: Document::empty(),
            mode,
            selection: None,
            overlay: OverlayState::new(),
            gesture: Gesture::Idle,
            text_edit: TextEditState::Idle,
            previews: PreviewSet::new(),
            pending_nudge: None,
            now_ms: 0,
            outbox: VecDeque::new(),
            open: true,
        }
    }

    /// Tear the session down. Every entry point becomes a no-op.
    pub fn close(&mut self) {
        self.clear_document_state();
        self.doc = Document::empty();
        self.outbox.clear();
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    // ---- host-visible state --------------------------------------------

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn selection(&self) -> Option<&SelectionModel> {
        self.selection.as_ref()
    }

    pub fn overlay_rect(&self) -> Option<Rect> {
        self.overlay.rect
    }

    pub fn is_text_editing(&self) -> bool {
        self.text_edit.is_editing()
    }

    /// Change the configured mode used by plain clicks.
    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
    }

    /// Take all queued outbound messages.
    pub fn drain_outbox(&mut self) -> Vec<SurfaceMessage> {
        self.outbox.drain(..).collect()
    }

    // ---- bridge: inbound -----------------------------------------------

    /// Handle one raw inbound message. Malformed or unrecognized input is
    /// dropped, never an error.
    pub fn handle_raw_message(&mut self, raw: &str) {
        match serde_json::from_str::<HostMessage>(raw) {
            Ok(msg) => self.handle_message(msg),
            Err(err) => tracing::debug!(%err, "dropping malformed bridge message"),
        }
    }

    pub fn handle_message(&mut self, msg: HostMessage) {
        if !self.open {
            return;
        }
        match msg {
            HostMessage::SetDocument { file, document } => {
                tracing::info!(%file, "loading document");
                self.clear_document_state();
                self.doc.replace(file, document);
                self.overlay.on_selection_changed(&self.doc, None);
            }

            HostMessage::PreviewStyle { file, line, style } => {
                self.previews
                    .apply(&mut self.doc, &self.config, &file, line, &style);
            }

            HostMessage::ClearPreview => {
                self.previews.clear(&mut self.doc);
            }

            HostMessage::RequestTargets {
                request_id,
                selector,
            } => {
                let targets = self.enumerate_targets(&selector);
                self.outbox.push_back(SurfaceMessage::TargetsList {
                    request_id,
                    targets,
                });
            }
        }
    }

    /// Old nodes are about to become (or already are) invalid: drop every
    /// piece of state that points into the tree. Previews are dropped
    /// without restoring, since there is nothing left to restore onto.
    fn clear_document_state(&mut self) {
        self.previews.reset();
        self.selection = None;
        self.gesture = Gesture::Idle;
        self.text_edit = TextEditState::Idle;
        self.pending_nudge = None;
        self.overlay.rect = None;
    }

    fn enumerate_targets(&self, selector: &str) -> Vec<TargetInfo> {
        let parsed = match Selector::parse(selector) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::debug!(%err, "unparsable target selector");
                return Vec::new();
            }
        };

        let mut seen: Vec<SourceLocator> = Vec::new();
        let mut targets = Vec::new();
        for id in parsed.query(&self.doc) {
            let Some((mapped, locator)) = self.doc.nearest_mapped(id) else {
                continue;
            };
            if seen.contains(&locator) {
                continue;
            }
            seen.push(locator.clone());
            let Some(node) = self.doc.get(mapped) else { continue };
            targets.push(TargetInfo {
                locator,
                tag: node.tag.clone(),
                classes: node.classes().iter().map(|c| c.to_string()).collect(),
                text_preview: crate::context::text_preview(
                    &self.doc,
                    mapped,
                    self.config.text_preview_len,
                ),
            });
        }
        targets
    }

    // ---- pointer input -------------------------------------------------

    pub fn pointer_down(&mut self, ev: PointerEvent) {
        if !self.open || self.doc.is_empty() {
            return;
        }

        // Clicks inside the editing target never steal focus mid-edit
        if let Some(target) = self.text_edit.target() {
            if self
                .doc
                .rect(target)
                .is_some_and(|r| r.contains(ev.point()))
            {
                return;
            }
            // Clicking elsewhere is a focus loss: commit first
            let outcome = self.text_edit.commit(&mut self.doc);
            self.emit_text_outcome(outcome);
        }

        let Some(hit) = hit_test(&self.doc, ev.point()) else {
            // Unresolvable: prior selection stays untouched
            return;
        };

        // Double activation goes to the text editor when the leaf
        // qualifies; otherwise it degrades to a plain selection click
        if ev.click_count >= 2 && self.try_start_text_edit(hit.leaf) {
            return;
        }

        let mode = effective_mode(self.mode, ev.modifiers);
        let model = SelectionModel::resolve(&self.doc, hit, mode, &self.config);
        let selected = model.selected;
        let jump = ev.modifiers.jump_to_source();
        let clicked = model.locator.clone();
        self.install_selection(model, true);

        if jump {
            if let Some(locator) = clicked {
                self.outbox
                    .push_back(SurfaceMessage::ElementClicked { locator });
            }
        }

        // The same press starts a drag gesture on the new selection
        if self.gesture.is_idle() && self.doc.rect(selected).is_some() {
            self.gesture = Gesture::Drag(DragState::begin(
                &self.doc,
                selected,
                ev.pointer_id,
                ev.x,
                ev.y,
            ));
        }
    }

    /// Begin a resize gesture from one of the overlay's eight handles.
    pub fn resize_start(&mut self, direction: ResizeDirection, ev: PointerEvent) {
        if !self.open || !self.gesture.is_idle() {
            return;
        }
        let Some(selected) = self.connected_selection() else {
            return;
        };
        if let Some(state) =
            ResizeState::begin(&self.doc, selected, direction, ev.pointer_id, ev.x, ev.y)
        {
            self.gesture = Gesture::Resize(state);
        }
    }

    pub fn pointer_move(&mut self, ev: PointerEvent) {
        if self.gesture.pointer_id() != Some(ev.pointer_id) {
            // Interleaved multi-pointer noise
            return;
        }

        match self.gesture {
            Gesture::Drag(drag) => {
                let (tx, ty) = drag.translate_at(ev.x, ev.y);
                self.write_translate(drag.node, tx, ty);
            }
            Gesture::Resize(resize) => {
                let geom = resize.geometry_at(ev.x, ev.y, self.config.min_resize_size);
                self.write_size(resize.node, geom.width, geom.height);
                self.write_translate(resize.node, geom.translate.0, geom.translate.1);
            }
            Gesture::Idle => {}
        }
        self.overlay.schedule_measure();
    }

    pub fn pointer_up(&mut self, ev: PointerEvent) {
        if self.gesture.pointer_id() != Some(ev.pointer_id) {
            return;
        }
        let gesture = std::mem::take(&mut self.gesture);

        match gesture {
            Gesture::Drag(drag) => {
                // The release position alone decides the final translate,
                // even when earlier moves left the element elsewhere
                let (tx, ty) = drag.translate_at(ev.x, ev.y);
                self.write_translate(drag.node, tx, ty);
                self.overlay.schedule_measure();
                if (tx, ty) == drag.origin_translate {
                    // Ended where it began: nothing to persist
                    return;
                }

                if let Some(locator) = self.gesture_locator(drag.node) {
                    let mut style = HashMap::new();
                    if let Some(t) = self.doc.inline_style(drag.node, "transform") {
                        style.insert("transform".to_string(), t);
                    }
                    self.emit_update_style(locator, style);
                }
            }

            Gesture::Resize(resize) => {
                let geom = resize.geometry_at(ev.x, ev.y, self.config.min_resize_size);
                self.write_size(resize.node, geom.width, geom.height);
                self.write_translate(resize.node, geom.translate.0, geom.translate.1);
                self.overlay.schedule_measure();

                if let Some(locator) = self.gesture_locator(resize.node) {
                    // Width, height and transform persist as one update
                    let mut style = HashMap::new();
                    for property in ["width", "height", "transform"] {
                        if let Some(value) = self.doc.inline_style(resize.node, property) {
                            style.insert(property.to_string(), value);
                        }
                    }
                    self.emit_update_style(locator, style);
                }
            }

            Gesture::Idle => {}
        }
    }

    /// Gesture aborted by the platform (capture lost). Pre-gesture
    /// visuals are restored and nothing persists.
    pub fn pointer_cancel(&mut self, ev: PointerEvent) {
        if self.gesture.pointer_id() != Some(ev.pointer_id) {
            return;
        }
        let gesture = std::mem::take(&mut self.gesture);

        match gesture {
            Gesture::Drag(drag) => {
                self.write_translate(drag.node, drag.origin_translate.0, drag.origin_translate.1);
            }
            Gesture::Resize(resize) => {
                resize.restore_origin(&mut self.doc);
            }
            Gesture::Idle => {}
        }
        self.overlay.schedule_measure();
    }

    // ---- keyboard input ------------------------------------------------

    pub fn key_down(&mut self, ev: KeyEvent) {
        if !self.open {
            return;
        }

        if self.text_edit.is_editing() {
            match ev.key {
                Key::Escape => {
                    let outcome = self.text_edit.cancel(&mut self.doc);
                    self.emit_text_outcome(outcome);
                }
                Key::Enter if !ev.modifiers.shift => {
                    let outcome = self.text_edit.commit(&mut self.doc);
                    self.emit_text_outcome(outcome);
                }
                _ => {}
            }
            return;
        }

        match ev.key {
            Key::Escape => {
                self.clear_selection();
            }
            Key::ArrowUp | Key::ArrowDown | Key::ArrowLeft | Key::ArrowRight => {
                self.nudge(ev);
            }
            _ => {}
        }
    }

    /// Arrow-key nudge: 1 px, 10 px with shift. Any other modifier means
    /// the key belongs to a browser or editor shortcut, so we stand down.
    fn nudge(&mut self, ev: KeyEvent) {
        if !ev.modifiers.at_most_shift() || !self.gesture.is_idle() {
            return;
        }
        let Some(selected) = self.connected_selection() else {
            return;
        };

        let step = if ev.modifiers.shift {
            self.config.nudge_step_large
        } else {
            self.config.nudge_step
        };
        let (dx, dy) = match ev.key {
            Key::ArrowUp => (0.0, -step),
            Key::ArrowDown => (0.0, step),
            Key::ArrowLeft => (-step, 0.0),
            Key::ArrowRight => (step, 0.0),
            _ => return,
        };

        let current = self
            .doc
            .inline_style(selected, "transform")
            .map(|t| transform::parse_translate(&t))
            .unwrap_or((0.0, 0.0));
        self.write_translate(selected, current.0 + dx, current.1 + dy);
        self.overlay.schedule_measure();

        // Persistence is debounced: every nudge pushes the deadline out
        let locator = self
            .selection
            .as_ref()
            .and_then(|s| s.locator.clone());
        self.pending_nudge = Some(PendingNudge {
            node: selected,
            locator,
            deadline_ms: self.now_ms + self.config.nudge_debounce_ms,
        });
    }

    // ---- text editing --------------------------------------------------

    fn try_start_text_edit(&mut self, leaf: NodeId) -> bool {
        if !self.text_edit.try_enter(&mut self.doc, leaf) {
            return false;
        }
        // The edit target becomes the selection if it is not already
        if self.selection.as_ref().map(|s| s.selected) != Some(leaf) {
            let model = SelectionModel::for_node(&self.doc, leaf, &self.config);
            self.install_selection(model, true);
        }
        true
    }

    /// Whole-content text update from the host's input layer.
    pub fn text_input(&mut self, text: &str) {
        self.text_edit.input(&mut self.doc, text);
    }

    /// The editing target lost input focus.
    pub fn blur(&mut self) {
        if self.text_edit.is_editing() {
            let outcome = self.text_edit.commit(&mut self.doc);
            self.emit_text_outcome(outcome);
        }
    }

    fn emit_text_outcome(&mut self, outcome: EditOutcome) {
        // State is already back to idle by the time we get here
        if let EditOutcome::Commit {
            node,
            locator,
            text,
        } = outcome
        {
            let element_context = element_context(&self.doc, node, &self.config);
            self.outbox.push_back(SurfaceMessage::UpdateText {
                file: locator.file.clone(),
                line: locator.line,
                column: locator.column,
                element_context,
                text,
            });
        }
    }

    // ---- selection -----------------------------------------------------

    /// Programmatic selection of a breadcrumb entry. The gesture's true
    /// leaf is kept as the breadcrumb base when still connected.
    pub fn select_breadcrumb(&mut self, index: usize) {
        let Some(selection) = &self.selection else { return };
        let Some(crumb) = selection.breadcrumbs.get(index) else {
            return;
        };
        let node = crumb.node;
        let leaf = selection.leaf;
        self.select_node(node, Some(leaf), true);
    }

    /// Select `node` directly, optionally preserving a leaf override for
    /// breadcrumb derivation.
    pub fn select_node(&mut self, node: NodeId, leaf: Option<NodeId>, notify: bool) {
        if !self.doc.is_connected(node) {
            return;
        }
        let mut model = SelectionModel::for_node(&self.doc, node, &self.config);
        if let Some(leaf) = leaf {
            if self.doc.is_connected(leaf) {
                model.leaf = leaf;
                model.breadcrumbs = crate::breadcrumbs::derive(&self.doc, leaf, &self.config);
            }
        }
        self.install_selection(model, notify);
    }

    fn install_selection(&mut self, model: SelectionModel, notify: bool) {
        tracing::debug!(
            selected = ?model.selected,
            locator = model.locator.as_ref().map(|l| l.to_string()),
            mode = ?model.mode,
            "selection changed"
        );
        self.selection = Some(model);
        self.overlay
            .on_selection_changed(&self.doc, self.selection.as_ref());

        if notify {
            if let Some(selection) = &self.selection {
                if let Some(locator) = selection.locator.clone() {
                    let context =
                        element_context(&self.doc, selection.selected, &self.config);
                    self.outbox.push_back(SurfaceMessage::ElementSelected {
                        locator,
                        context,
                    });
                }
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
        self.gesture = Gesture::Idle;
        self.overlay.on_selection_changed(&self.doc, None);
    }

    /// The selected node, when the selection is still connected.
    fn connected_selection(&self) -> Option<NodeId> {
        self.selection
            .as_ref()
            .filter(|s| s.is_connected(&self.doc))
            .map(|s| s.selected)
    }

    /// Locator to persist a gesture against: the current selection's, and
    /// only when the gesture node is still the selected node. A group
    /// root without a locator persists nothing.
    fn gesture_locator(&self, node: NodeId) -> Option<SourceLocator> {
        self.selection
            .as_ref()
            .filter(|s| s.selected == node)
            .and_then(|s| s.locator.clone())
    }

    // ---- scheduling ----------------------------------------------------

    /// Animation-frame callback: at most one geometry measurement happens
    /// here regardless of how many triggers fired since the last frame.
    /// A disconnected selection is dropped (silently) at this point.
    pub fn run_frame(&mut self) {
        if !self.open {
            return;
        }
        if let Some(selection) = &self.selection {
            if !selection.is_connected(&self.doc) {
                self.selection = None;
                self.gesture = Gesture::Idle;
            }
        }
        self.overlay.run_frame(&self.doc, self.selection.as_ref());
    }

    /// Advance the session clock and fire any due timer (the nudge
    /// debounce). Hosts call this with a monotonic milliseconds value.
    pub fn advance(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
        let due = self
            .pending_nudge
            .as_ref()
            .is_some_and(|p| p.deadline_ms <= now_ms);
        if !due {
            return;
        }
        let Some(pending) = self.pending_nudge.take() else {
            return;
        };

        let Some(locator) = pending.locator else {
            return;
        };
        if !self.doc.is_connected(pending.node) {
            return;
        }
        let mut style = HashMap::new();
        if let Some(t) = self.doc.inline_style(pending.node, "transform") {
            style.insert("transform".to_string(), t);
        }
        if !style.is_empty() {
            self.emit_update_style(locator, style);
        }
    }

    /// Window geometry changed.
    pub fn window_resized(&mut self) {
        self.overlay.schedule_measure();
    }

    /// A container scrolled. Ignored unless it can move the selection.
    pub fn scrolled(&mut self, node: NodeId) {
        self.overlay.on_scroll(node);
    }

    // ---- style writes --------------------------------------------------

    fn write_translate(&mut self, node: NodeId, tx: f64, ty: f64) {
        let current = self.doc.inline_style(node, "transform");
        let value = transform::with_translate(current.as_deref(), tx, ty);
        let _ = self.doc.set_inline_style(node, "transform", &value);
    }

    fn write_size(&mut self, node: NodeId, width: f64, height: f64) {
        let w = format!("{}px", width.round() as i64);
        let h = format!("{}px", height.round() as i64);
        let _ = self.doc.set_inline_style(node, "width", &w);
        let _ = self.doc.set_inline_style(node, "height", &h);
    }

    fn emit_update_style(&mut self, locator: SourceLocator, style: HashMap<String, String>) {
        tracing::debug!(%locator, properties = style.len(), "persisting style");
        self.outbox.push_back(SurfaceMessage::UpdateStyle {
            file: locator.file,
            line: locator.line,
            style,
        });
    }
}
