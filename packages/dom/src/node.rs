//! Tree node storage.

use crate::layout::Layout;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Handle into a [`crate::Document`] arena.
///
/// The id embeds the document epoch it was minted under: replacing the
/// document bumps the epoch and silently invalidates every outstanding id.
/// That is how "the selected element is no longer connected" is detected
/// without back-pointers into freed nodes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId {
    pub(crate) epoch: u32,
    pub(crate) index: u32,
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}.{})", self.epoch, self.index)
    }
}

/// One element in the rendered tree.
///
/// Text is modeled as a field rather than a separate node kind: the engine
/// only ever cares about text on leaves (elements with no element
/// children), which is also the only shape the text-edit state machine
/// accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub tag: String,

    pub attributes: HashMap<String, String>,

    /// Declared inline style properties (the `style` attribute, parsed by
    /// the renderer). This is what preview patches and gesture writes
    /// mutate, and what must be restored exactly.
    pub inline_styles: HashMap<String, String>,

    /// Renderer-stamped computed style snapshot.
    pub computed_styles: HashMap<String, String>,

    /// Own text content, for text-bearing leaves.
    pub text: Option<String>,

    pub layout: Layout,

    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) detached: bool,
}

impl Node {
    pub fn new(tag: impl Into<String>, layout: Layout) -> Self {
        Self {
            tag: tag.into(),
            attributes: HashMap::new(),
            inline_styles: HashMap::new(),
            computed_styles: HashMap::new(),
            text: None,
            layout,
            parent: None,
            children: Vec::new(),
            detached: false,
        }
    }

    /// Class names split out of the `class` attribute.
    pub fn classes(&self) -> Vec<&str> {
        self.attributes
            .get("class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }

    pub fn has_class_containing(&self, pattern: &str) -> bool {
        self.classes().iter().any(|c| c.contains(pattern))
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn is_heading(&self) -> bool {
        matches!(self.tag.as_str(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
    }

    /// A leaf with non-empty own text and no element children, the only
    /// thing the text editor will touch.
    pub fn is_text_leaf(&self) -> bool {
        self.children.is_empty()
            && self
                .text
                .as_ref()
                .is_some_and(|t| !t.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classes() {
        let mut node = Node::new("div", Layout::default());
        node.attributes
            .insert("class".to_string(), "card  hero-card primary".to_string());
        assert_eq!(node.classes(), vec!["card", "hero-card", "primary"]);
        assert!(node.has_class_containing("hero"));
        assert!(!node.has_class_containing("button"));
    }

    #[test]
    fn test_text_leaf() {
        let mut node = Node::new("p", Layout::default());
        assert!(!node.is_text_leaf());

        node.text = Some("   ".to_string());
        assert!(!node.is_text_leaf());

        node.text = Some("Hello".to_string());
        assert!(node.is_text_leaf());
    }

    #[test]
    fn test_headings() {
        assert!(Node::new("h2", Layout::default()).is_heading());
        assert!(!Node::new("header", Layout::default()).is_heading());
    }
}
