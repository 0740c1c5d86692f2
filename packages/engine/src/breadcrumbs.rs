//! # Breadcrumb Derivation
//!
//! A root-first trail of "meaningful" ancestors from the structural root
//! down to the current leaf. Both endpoints are always retained; interior
//! entries survive only if a heuristic marks them important; the trail is
//! capped by dropping the earliest non-endpoint entries first.

use crate::config::EngineConfig;
use loupe_dom::{Document, NodeId, EDIT_ROOT_ATTR, GROUP_ROOT_ATTR};

/// One entry of the trail.
#[derive(Debug, Clone, PartialEq)]
pub struct Breadcrumb {
    pub node: NodeId,
    pub label: String,
}

/// Derive the trail for the current leaf.
pub fn derive(doc: &Document, leaf: NodeId, config: &EngineConfig) -> Vec<Breadcrumb> {
    // Leaf-first chain up to the declared structural root, or the whole
    // chain when no root is declared (the tree root acts as a synthetic
    // one).
    let mut chain: Vec<NodeId> = Vec::new();
    for id in doc.ancestors_inclusive(leaf) {
        chain.push(id);
        if doc.get(id).is_some_and(|n| n.has_attr(EDIT_ROOT_ATTR)) {
            break;
        }
    }
    chain.reverse(); // root-first

    let last = chain.len().saturating_sub(1);
    let mut trail: Vec<Breadcrumb> = chain
        .iter()
        .enumerate()
        .filter(|&(i, &id)| i == 0 || i == last || is_important(doc, id, config))
        .map(|(_, &id)| Breadcrumb {
            node: id,
            label: label_for(doc, id, config),
        })
        .collect();

    // Cap the trail: drop earliest non-endpoint entries, never the leaf
    while trail.len() > config.max_breadcrumbs.max(2) {
        trail.remove(1);
    }

    trail
}

/// Worth keeping as an interior crumb?
pub fn is_important(doc: &Document, id: NodeId, config: &EngineConfig) -> bool {
    let Some(node) = doc.get(id) else { return false };
    if node.has_attr(GROUP_ROOT_ATTR) || node.is_heading() {
        return true;
    }
    config
        .container_vocabulary
        .iter()
        .any(|pattern| node.has_class_containing(pattern))
}

/// Human label for one crumb.
///
/// Edit roots get a fixed label; declared group roots read as scroll
/// boxes or plain groups; otherwise the configured class-pattern table
/// decides, with a semantic tag default as the last resort.
pub fn label_for(doc: &Document, id: NodeId, config: &EngineConfig) -> String {
    let Some(node) = doc.get(id) else {
        return String::new();
    };

    if node.has_attr(EDIT_ROOT_ATTR) {
        return "canvas".to_string();
    }

    if node.has_attr(GROUP_ROOT_ATTR) {
        let scrolls = config
            .scroll_vocabulary
            .iter()
            .any(|pattern| node.has_class_containing(pattern));
        return if scrolls { "scroll box" } else { "group" }.to_string();
    }

    for rule in &config.label_rules {
        if node.has_class_containing(&rule.pattern) {
            return rule.label.clone();
        }
    }

    match node.tag.as_str() {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => "title".to_string(),
        "p" => "text".to_string(),
        tag => tag.to_string(),
    }
}
