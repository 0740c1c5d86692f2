//! Attribute vocabulary shared with the upstream renderer.
//!
//! The compiler stamps locator and grouping attributes onto elements it
//! chose to map; the engine only ever reads those. The editing-state
//! attributes at the bottom are the ones this system writes (and removes
//! again on exit).

use crate::node::Node;
use loupe_common::SourceLocator;

/// Source file the element was compiled from.
pub const SOURCE_FILE_ATTR: &str = "data-source-file";

/// 1-based source line.
pub const SOURCE_LINE_ATTR: &str = "data-source-line";

/// Optional 0-based source column.
pub const SOURCE_COL_ATTR: &str = "data-source-col";

/// Compiler-designated semantic container (declared group root).
pub const GROUP_ROOT_ATTR: &str = "data-group-root";

/// Structural root of the editable canvas.
pub const EDIT_ROOT_ATTR: &str = "data-edit-root";

/// Conventional "target area" marker, the fallback grouping boundary.
pub const TARGET_AREA_ATTR: &str = "data-target-area";

/// Marks overlay chrome so hit-testing never selects our own controls.
pub const OVERLAY_UI_ATTR: &str = "data-loupe-ui";

/// Written while an element is in-place text editable.
pub const CONTENT_EDITABLE_ATTR: &str = "contenteditable";

/// Written while an element is actively being text edited.
pub const EDITING_ATTR: &str = "data-editing";

/// Read the locator attribute set off a node, if complete.
///
/// Requires file + line; line must parse and be >= 1. A malformed column
/// is dropped rather than invalidating the locator.
pub fn locator_of(node: &Node) -> Option<SourceLocator> {
    let file = node.attributes.get(SOURCE_FILE_ATTR)?;
    let line: u32 = node.attributes.get(SOURCE_LINE_ATTR)?.parse().ok()?;
    if line < 1 {
        return None;
    }

    let column = node
        .attributes
        .get(SOURCE_COL_ATTR)
        .and_then(|c| c.parse().ok());

    Some(SourceLocator {
        file: file.clone(),
        line,
        column,
    })
}
