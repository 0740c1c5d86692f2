//! Bridge message types, tagged by `command`.

use crate::context::{ElementContext, TargetInfo};
use loupe_common::SourceLocator;
use loupe_dom::NodePayload;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Host → surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum HostMessage {
    /// Replace the entire rendered tree. Side effect: all preview patches
    /// and the current selection are cleared, since old nodes are no
    /// longer valid.
    #[serde(rename_all = "camelCase")]
    SetDocument {
        file: String,
        document: Vec<NodePayload>,
    },

    /// Apply temporary inline style overrides to the element matching the
    /// locator. Each overridden property's prior value is recorded exactly
    /// once per (locator, property) until cleared.
    #[serde(rename_all = "camelCase")]
    PreviewStyle {
        file: String,
        line: u32,
        style: HashMap<String, String>,
    },

    /// Restore every recorded prior value and empty the patch set.
    ClearPreview,

    /// Enumerate elements matching `selector`, mapped to their nearest
    /// locator-bearing ancestors and de-duplicated by locator.
    #[serde(rename_all = "camelCase")]
    RequestTargets { request_id: String, selector: String },
}

/// Surface → host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum SurfaceMessage {
    /// A new selection was made.
    #[serde(rename_all = "camelCase")]
    ElementSelected {
        locator: SourceLocator,
        context: ElementContext,
    },

    /// Emitted in addition to selection when the jump-to-source modifier
    /// is held.
    #[serde(rename_all = "camelCase")]
    ElementClicked { locator: SourceLocator },

    /// Persist width/height/transform after a gesture.
    #[serde(rename_all = "camelCase")]
    UpdateStyle {
        file: String,
        line: u32,
        style: HashMap<String, String>,
    },

    /// Persist a committed text edit.
    #[serde(rename_all = "camelCase")]
    UpdateText {
        file: String,
        line: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        column: Option<u32>,
        element_context: ElementContext,
        text: String,
    },

    /// Reply to `requestTargets`.
    #[serde(rename_all = "camelCase")]
    TargetsList {
        request_id: String,
        targets: Vec<TargetInfo>,
    },
}
