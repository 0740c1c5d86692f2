//! Builds the element-context payload attached to `elementSelected` and
//! `updateText` messages.

use crate::config::EngineConfig;
use crate::overlay;
use loupe_dom::{locator_of, Document, NodeId, GROUP_ROOT_ATTR};
use loupe_protocol::{
    AncestorSummary, ElementContext, GroupSummary, ScrollSummary, SelectionHints,
};
use std::collections::HashMap;

/// Snapshot a node for the host.
pub fn element_context(doc: &Document, id: NodeId, config: &EngineConfig) -> ElementContext {
    let Some(node) = doc.get(id) else {
        return ElementContext::default();
    };

    ElementContext {
        tag: node.tag.clone(),
        id: node.attr("id").map(str::to_string),
        classes: node.classes().iter().map(|c| c.to_string()).collect(),
        role: node.attr("role").map(str::to_string),
        href: node.attr("href").map(str::to_string),
        input_type: node.attr("type").map(str::to_string),
        text_preview: text_preview(doc, id, config.text_preview_len),
        styles: style_snapshot(doc, id, config),
        ancestors: mapped_ancestors(doc, id, config.max_context_ancestors),
        hints: selection_hints(doc, id),
    }
}

/// Trimmed, capped text preview of a node's subtree.
pub fn text_preview(doc: &Document, id: NodeId, cap: usize) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    for descendant in doc.descendants_inclusive(id) {
        if let Some(text) = doc.get(descendant).and_then(|n| n.text.clone()) {
            let trimmed = text.trim().to_string();
            if !trimmed.is_empty() {
                parts.push(trimmed);
            }
        }
    }
    if parts.is_empty() {
        return None;
    }
    let mut joined = parts.join(" ");
    if joined.chars().count() > cap {
        joined = joined.chars().take(cap).collect::<String>() + "…";
    }
    Some(joined)
}

/// Computed-style snapshot over the fixed allow-list. Inline declarations
/// win over the renderer's computed values, since previews and gestures
/// write inline.
fn style_snapshot(doc: &Document, id: NodeId, config: &EngineConfig) -> HashMap<String, String> {
    let Some(node) = doc.get(id) else {
        return HashMap::new();
    };
    config
        .style_allow_list
        .iter()
        .filter_map(|property| {
            node.inline_styles
                .get(property)
                .or_else(|| node.computed_styles.get(property))
                .map(|value| (property.clone(), value.clone()))
        })
        .collect()
}

/// Locator-bearing ancestors of `id`, nearest first, capped.
fn mapped_ancestors(doc: &Document, id: NodeId, cap: usize) -> Vec<AncestorSummary> {
    doc.ancestors_inclusive(id)
        .into_iter()
        .skip(1)
        .filter(|&a| doc.get(a).map(locator_of).flatten().is_some())
        .take(cap)
        .filter_map(|a| {
            doc.get(a).map(|n| AncestorSummary {
                tag: n.tag.clone(),
                classes: n.classes().iter().map(|c| c.to_string()).collect(),
            })
        })
        .collect()
}

fn selection_hints(doc: &Document, id: NodeId) -> SelectionHints {
    let is_scroll_container = doc
        .get(id)
        .is_some_and(|n| n.layout.is_scroll_container());

    let scroll_container = overlay::nearest_scroll_ancestor(doc, id).and_then(|s| {
        doc.get(s).map(|n| ScrollSummary {
            tag: n.tag.clone(),
            classes: n.classes().iter().map(|c| c.to_string()).collect(),
            vertical: n.layout.scrolls_vertically(),
            horizontal: n.layout.scrolls_horizontally(),
        })
    });

    let group_item_root = doc
        .nearest_ancestor(id, |n| n.has_attr(GROUP_ROOT_ATTR))
        .and_then(|g| {
            doc.get(g).map(|n| GroupSummary {
                tag: n.tag.clone(),
                classes: n.classes().iter().map(|c| c.to_string()).collect(),
                locator: locator_of(n),
            })
        });

    SelectionHints {
        is_scroll_container,
        is_inside_scroll: scroll_container.is_some(),
        scroll_container,
        group_item_root,
    }
}
