//! # Group Resolver
//!
//! Finds the semantically meaningful container for a mapped element, and
//! decides which selection mode a click resolves to.

use crate::events::Modifiers;
use loupe_common::SourceLocator;
use loupe_dom::{Document, NodeId, GROUP_ROOT_ATTR, TARGET_AREA_ATTR};
use serde::{Deserialize, Serialize};

/// What a selection acts on: the mapped element itself, or its resolved
/// group container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    #[default]
    Element,
    Group,
}

/// Resolve the group container for a mapped element.
///
/// Precedence: nearest ancestor-or-self declared as a group root, then
/// nearest carrying the conventional target-area marker, then the element
/// itself.
pub fn resolve_group_root(doc: &Document, mapped: NodeId) -> NodeId {
    doc.nearest_ancestor(mapped, |n| n.has_attr(GROUP_ROOT_ATTR))
        .or_else(|| doc.nearest_ancestor(mapped, |n| n.has_attr(TARGET_AREA_ATTR)))
        .unwrap_or(mapped)
}

/// Group roots are not guaranteed to be mapped themselves: re-walk outward
/// from the resolved root for the nearest locator carrier. `None` means
/// the group selection cannot be persisted (the bridge will refuse it).
pub fn map_group_root_to_locator(
    doc: &Document,
    group_root: NodeId,
) -> Option<(NodeId, SourceLocator)> {
    doc.nearest_mapped(group_root)
}

/// Selection-mode policy for a click: force-leaf wins, then force-group,
/// then whatever mode is configured.
pub fn effective_mode(configured: SelectionMode, modifiers: Modifiers) -> SelectionMode {
    if modifiers.force_element() {
        SelectionMode::Element
    } else if modifiers.force_group() {
        SelectionMode::Group
    } else {
        configured
    }
}
