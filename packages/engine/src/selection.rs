//! # Selection Model
//!
//! One owned record of what is selected. Replaced wholesale on every new
//! selection, cleared when the document reloads or the element leaves the
//! tree; never mutated piecemeal from event handlers.

use crate::breadcrumbs::{self, Breadcrumb};
use crate::config::EngineConfig;
use crate::groups::{self, SelectionMode};
use crate::hit_test::Hit;
use loupe_common::SourceLocator;
use loupe_dom::Document;
use loupe_dom::NodeId;

/// The current selection.
///
/// `leaf` is the literal node under the pointer; `mapped` is the nearest
/// ancestor-or-self carrying a locator; `selected` is what operations act
/// on (`mapped` in element mode, the resolved group root in group mode).
/// `locator` belongs to whichever node backs `selected`; a group root
/// with no locator anywhere above it yields `locator: None`, which the
/// bridge treats as unpersistable.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionModel {
    pub mode: SelectionMode,
    pub leaf: NodeId,
    pub mapped: NodeId,
    pub selected: NodeId,
    pub group_root: Option<NodeId>,
    pub locator: Option<SourceLocator>,
    pub breadcrumbs: Vec<Breadcrumb>,
}

impl SelectionModel {
    /// Resolve a hit into a full selection under the given mode.
    pub fn resolve(doc: &Document, hit: Hit, mode: SelectionMode, config: &EngineConfig) -> Self {
        let (selected, group_root, locator) = match mode {
            SelectionMode::Element => {
                let locator = doc.nearest_mapped(hit.mapped).map(|(_, loc)| loc);
                (hit.mapped, None, locator)
            }
            SelectionMode::Group => {
                let root = groups::resolve_group_root(doc, hit.mapped);
                match groups::map_group_root_to_locator(doc, root) {
                    Some((mapped_root, locator)) => (mapped_root, Some(root), Some(locator)),
                    // Unmapped group root: still selectable, never persistable
                    None => (root, Some(root), None),
                }
            }
        };

        Self {
            mode,
            leaf: hit.leaf,
            mapped: hit.mapped,
            selected,
            group_root,
            locator,
            breadcrumbs: breadcrumbs::derive(doc, hit.leaf, config),
        }
    }

    /// Selection for a programmatic pick (breadcrumb click): the node is
    /// its own leaf.
    pub fn for_node(doc: &Document, node: NodeId, config: &EngineConfig) -> Self {
        let locator = doc.nearest_mapped(node).map(|(_, loc)| loc);
        Self {
            mode: SelectionMode::Element,
            leaf: node,
            mapped: node,
            selected: node,
            group_root: None,
            locator,
            breadcrumbs: breadcrumbs::derive(doc, node, config),
        }
    }

    /// Still pointing at live tree nodes?
    pub fn is_connected(&self, doc: &Document) -> bool {
        doc.is_connected(self.selected)
    }
}
