//! # Document Arena
//!
//! Owns the rendered tree for one loaded source document.
//!
//! ## Lifecycle
//!
//! ```text
//! Host setDocument → replace() → select/measure/mutate → setDocument → ...
//! ```
//!
//! Replacing the document bumps the epoch, which invalidates every
//! [`NodeId`] handed out before. Stale ids are answered with `None`
//! (reads) or [`DomError::StaleNode`] (writes), never stale data.
//!
//! ## Mutation generation
//!
//! Every in-place mutation bumps a generation counter. The overlay engine
//! observes the counter at frame time instead of registering per-node
//! observers; that is the headless analogue of a subtree mutation
//! observer on the canvas root.

use crate::attrs::{locator_of, EDIT_ROOT_ATTR};
use crate::error::DomError;
use crate::layout::Layout;
use crate::node::{Node, NodeId};
use loupe_common::{Point, SourceLocator};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Wire shape of one rendered node, as delivered by the host inside a
/// `setDocument` message. Mirrors what the upstream renderer measures.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodePayload {
    pub tag: String,
    pub attributes: HashMap<String, String>,
    pub inline_styles: HashMap<String, String>,
    pub computed_styles: HashMap<String, String>,
    pub text: Option<String>,
    pub layout: Layout,
    pub children: Vec<NodePayload>,
}

impl NodePayload {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }
}

/// The rendered tree for the currently loaded document.
#[derive(Debug, Default)]
pub struct Document {
    /// Source file this tree was rendered from.
    file: String,

    epoch: u32,
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    mutation_gen: u64,
}

impl Document {
    /// Empty document; nothing is selectable until the first `replace`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Replace the whole tree. All previously issued NodeIds become
    /// disconnected.
    pub fn replace(&mut self, file: impl Into<String>, payload: Vec<NodePayload>) {
        self.epoch = self.epoch.wrapping_add(1);
        self.file = file.into();
        self.nodes.clear();
        self.roots.clear();
        self.mutation_gen += 1;

        let roots: Vec<NodeId> = payload
            .into_iter()
            .map(|p| self.build_node(p, None))
            .collect();
        self.roots = roots;

        tracing::debug!(
            file = %self.file,
            nodes = self.nodes.len(),
            "document replaced"
        );
    }

    fn build_node(&mut self, payload: NodePayload, parent: Option<NodeId>) -> NodeId {
        let id = NodeId {
            epoch: self.epoch,
            index: self.nodes.len() as u32,
        };

        let mut node = Node::new(payload.tag, payload.layout);
        node.attributes = payload.attributes;
        node.inline_styles = payload.inline_styles;
        node.computed_styles = payload.computed_styles;
        node.text = payload.text;
        node.parent = parent;
        self.nodes.push(node);

        let children: Vec<NodeId> = payload
            .children
            .into_iter()
            .map(|c| self.build_node(c, Some(id)))
            .collect();
        self.nodes[id.index as usize].children = children;

        id
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Monotonic counter bumped on every in-place mutation or replace.
    pub fn mutation_generation(&self) -> u64 {
        self.mutation_gen
    }

    // ---- reads ---------------------------------------------------------

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.epoch != self.epoch {
            return None;
        }
        self.nodes.get(id.index as usize)
    }

    fn get_mut_checked(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        if id.epoch != self.epoch || id.index as usize >= self.nodes.len() {
            return Err(DomError::StaleNode(format!("{:?}", id)));
        }
        if !self.is_connected(id) {
            return Err(DomError::StaleNode(format!("{:?}", id)));
        }
        Ok(&mut self.nodes[id.index as usize])
    }

    /// Still part of the current tree: right epoch and no detached
    /// ancestor on the path to a root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        if id.epoch != self.epoch {
            return false;
        }
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(node) = self.nodes.get(current.index as usize) else {
                return false;
            };
            if node.detached {
                return false;
            }
            cursor = node.parent;
        }
        true
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Chain from `id` up to its root, self first.
    pub fn ancestors_inclusive(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut cursor = if self.get(id).is_some() { Some(id) } else { None };
        while let Some(current) = cursor {
            chain.push(current);
            cursor = self.parent(current);
        }
        chain
    }

    /// Nearest ancestor-or-self satisfying `predicate`.
    pub fn nearest_ancestor(
        &self,
        id: NodeId,
        predicate: impl Fn(&Node) -> bool,
    ) -> Option<NodeId> {
        self.ancestors_inclusive(id)
            .into_iter()
            .find(|&a| self.get(a).is_some_and(&predicate))
    }

    /// Nearest locator-bearing ancestor-or-self, with its locator.
    pub fn nearest_mapped(&self, id: NodeId) -> Option<(NodeId, SourceLocator)> {
        self.ancestors_inclusive(id)
            .into_iter()
            .find_map(|a| self.get(a).and_then(locator_of).map(|loc| (a, loc)))
    }

    /// Document-order (preorder) traversal of the whole tree.
    pub fn iter(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        for &root in &self.roots {
            self.preorder(root, &mut order);
        }
        order
    }

    /// Preorder traversal of one subtree.
    pub fn descendants_inclusive(&self, root: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        if self.get(root).is_some() {
            self.preorder(root, &mut order);
        }
        order
    }

    fn preorder(&self, id: NodeId, out: &mut Vec<NodeId>) {
        let Some(node) = self.get(id) else { return };
        if node.detached {
            return;
        }
        out.push(id);
        for &child in &node.children {
            self.preorder(child, out);
        }
    }

    /// Declared structural root of the editable canvas, if any.
    pub fn edit_root(&self) -> Option<NodeId> {
        self.iter()
            .into_iter()
            .find(|&id| self.get(id).is_some_and(|n| n.has_attr(EDIT_ROOT_ATTR)))
    }

    /// First element in document order matching `(file, line)`. Duplicate
    /// locators are tolerated by taking the first match, never erroring.
    pub fn find_by_line(&self, file: &str, line: u32) -> Option<NodeId> {
        self.iter().into_iter().find(|&id| {
            self.get(id)
                .and_then(locator_of)
                .is_some_and(|loc| loc.matches_line(file, line))
        })
    }

    pub fn find_by_locator(&self, locator: &SourceLocator) -> Option<NodeId> {
        self.find_by_line(&locator.file, locator.line)
    }

    /// Elements whose bounding rect contains `point`, topmost first.
    ///
    /// Paint order is approximated by preorder position: later and deeper
    /// elements stack above earlier ones, so the stacked list is the
    /// preorder hits reversed.
    pub fn elements_at_point(&self, point: Point) -> Vec<NodeId> {
        let mut hits: Vec<NodeId> = self
            .iter()
            .into_iter()
            .filter(|&id| {
                self.get(id)
                    .is_some_and(|n| n.layout.rect.contains(point))
            })
            .collect();
        hits.reverse();
        hits
    }

    /// Bounding rect of a connected node; `None` once disconnected.
    pub fn rect(&self, id: NodeId) -> Option<loupe_common::Rect> {
        if !self.is_connected(id) {
            return None;
        }
        self.get(id).map(|n| n.layout.rect)
    }

    // ---- writes --------------------------------------------------------

    pub fn set_inline_style(
        &mut self,
        id: NodeId,
        property: &str,
        value: &str,
    ) -> Result<(), DomError> {
        let node = self.get_mut_checked(id)?;
        node.inline_styles
            .insert(property.to_string(), value.to_string());
        self.mutation_gen += 1;
        Ok(())
    }

    pub fn remove_inline_style(&mut self, id: NodeId, property: &str) -> Result<(), DomError> {
        let node = self.get_mut_checked(id)?;
        node.inline_styles.remove(property);
        self.mutation_gen += 1;
        Ok(())
    }

    pub fn inline_style(&self, id: NodeId, property: &str) -> Option<String> {
        self.get(id)
            .and_then(|n| n.inline_styles.get(property).cloned())
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let node = self.get_mut_checked(id)?;
        node.attributes.insert(name.to_string(), value.to_string());
        self.mutation_gen += 1;
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<(), DomError> {
        let node = self.get_mut_checked(id)?;
        node.attributes.remove(name);
        self.mutation_gen += 1;
        Ok(())
    }

    pub fn set_text(&mut self, id: NodeId, text: &str) -> Result<(), DomError> {
        let node = self.get_mut_checked(id)?;
        node.text = Some(text.to_string());
        self.mutation_gen += 1;
        Ok(())
    }

    /// Renderer pushed fresh geometry for a node (headless analogue of a
    /// size-observer callback).
    pub fn update_layout(&mut self, id: NodeId, layout: Layout) -> Result<(), DomError> {
        let node = self.get_mut_checked(id)?;
        node.layout = layout;
        self.mutation_gen += 1;
        Ok(())
    }

    /// Remove a subtree from the live tree without freeing it. Outstanding
    /// ids into the subtree stop being connected.
    pub fn detach(&mut self, id: NodeId) -> Result<(), DomError> {
        let node = self.get_mut_checked(id)?;
        node.detached = true;
        let parent = node.parent;
        if let Some(parent) = parent {
            self.nodes[parent.index as usize]
                .children
                .retain(|&c| c != id);
        } else {
            self.roots.retain(|&r| r != id);
        }
        self.mutation_gen += 1;
        Ok(())
    }
}
