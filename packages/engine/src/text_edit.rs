//! # Text-Edit State Machine
//!
//! `idle → editing → idle`. Entry requires a double-activation gesture on
//! a leaf that has non-empty text, no element children (structural
//! wrappers are never made editable), and a locator (an edit with no
//! locator could never be persisted). Every exit path removes the
//! editing attributes and returns to idle *before* any message is
//! emitted, so a rapid follow-up edit cannot race an in-flight exit.

use loupe_common::SourceLocator;
use loupe_dom::{Document, NodeId, CONTENT_EDITABLE_ATTR, EDITING_ATTR};

/// Live edit on one text leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct EditingState {
    pub node: NodeId,
    pub locator: SourceLocator,
    /// Original text, restored on cancel and compared on commit.
    snapshot: String,
}

/// The state machine.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TextEditState {
    #[default]
    Idle,
    Editing(EditingState),
}

/// How an edit ended.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// Text changed; emit `updateText` with this payload.
    Commit {
        node: NodeId,
        locator: SourceLocator,
        text: String,
    },
    /// Unchanged or cancelled; emit nothing.
    Silent,
}

impl TextEditState {
    pub fn is_editing(&self) -> bool {
        matches!(self, TextEditState::Editing(_))
    }

    /// The node currently being edited, if any.
    pub fn target(&self) -> Option<NodeId> {
        match self {
            TextEditState::Editing(e) => Some(e.node),
            TextEditState::Idle => None,
        }
    }

    /// Attempt idle → editing on `node`. Returns whether editing began.
    ///
    /// On success the target is marked editable with a snapshot taken;
    /// the caller is responsible for having selected it and for giving it
    /// input focus with all text selected.
    pub fn try_enter(&mut self, doc: &mut Document, node: NodeId) -> bool {
        if self.is_editing() {
            return false;
        }
        let Some(n) = doc.get(node) else { return false };
        if !n.is_text_leaf() {
            return false;
        }
        let Some(locator) = loupe_dom::locator_of(n) else {
            return false;
        };
        let snapshot = n.text.clone().unwrap_or_default();

        // Mark editable; removed again on every exit path
        if doc.set_attribute(node, CONTENT_EDITABLE_ATTR, "true").is_err() {
            return false;
        }
        let _ = doc.set_attribute(node, EDITING_ATTR, "true");

        tracing::debug!(%locator, "text edit started");
        *self = TextEditState::Editing(EditingState {
            node,
            locator,
            snapshot,
        });
        true
    }

    /// Replace the edited text (hosts deliver whole-content updates).
    pub fn input(&self, doc: &mut Document, text: &str) {
        if let TextEditState::Editing(e) = self {
            let _ = doc.set_text(e.node, text);
        }
    }

    /// Commit exit (Enter or focus loss). Idempotent: unchanged text
    /// produces `Silent`.
    pub fn commit(&mut self, doc: &mut Document) -> EditOutcome {
        let TextEditState::Editing(editing) = std::mem::take(self) else {
            return EditOutcome::Silent;
        };
        let final_text = doc
            .get(editing.node)
            .and_then(|n| n.text.clone())
            .unwrap_or_default();
        Self::remove_marks(doc, editing.node);

        if final_text == editing.snapshot {
            return EditOutcome::Silent;
        }
        EditOutcome::Commit {
            node: editing.node,
            locator: editing.locator,
            text: final_text,
        }
    }

    /// Cancel exit (Escape): restore the snapshot, emit nothing.
    pub fn cancel(&mut self, doc: &mut Document) -> EditOutcome {
        let TextEditState::Editing(editing) = std::mem::take(self) else {
            return EditOutcome::Silent;
        };
        let _ = doc.set_text(editing.node, &editing.snapshot);
        Self::remove_marks(doc, editing.node);
        EditOutcome::Silent
    }

    fn remove_marks(doc: &mut Document, node: NodeId) {
        let _ = doc.remove_attribute(node, CONTENT_EDITABLE_ATTR);
        let _ = doc.remove_attribute(node, EDITING_ATTR);
    }
}
