//! Element context payloads attached to selection and text messages.
//!
//! These give the host enough to display an inspector and to write a
//! sensible edit without re-querying the surface.

use loupe_common::SourceLocator;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Snapshot of the selected element, sent with `elementSelected` and
/// `updateText`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementContext {
    pub tag: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub classes: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,

    /// The `type` attribute, for inputs and buttons.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,

    /// Trimmed, length-capped text content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_preview: Option<String>,

    /// Computed style snapshot over the fixed allow-list.
    pub styles: HashMap<String, String>,

    /// Locator-bearing ancestors, nearest first, capped.
    pub ancestors: Vec<AncestorSummary>,

    pub hints: SelectionHints,
}

/// One locator-bearing ancestor of the selection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AncestorSummary {
    pub tag: String,
    pub classes: Vec<String>,
}

/// Structural hints the host uses to pick sensible edit strategies.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectionHints {
    pub is_scroll_container: bool,
    pub is_inside_scroll: bool,

    /// Nearest enclosing scroll container, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_container: Option<ScrollSummary>,

    /// Nearest declared group root enclosing the selection, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_item_root: Option<GroupSummary>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScrollSummary {
    pub tag: String,
    pub classes: Vec<String>,
    pub vertical: bool,
    pub horizontal: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupSummary {
    pub tag: String,
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locator: Option<SourceLocator>,
}

/// One entry of a `targetsList` reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetInfo {
    pub locator: SourceLocator,
    pub tag: String,
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_preview: Option<String>,
}
