//! # Hit-Test Resolver
//!
//! Turns a screen point into the topmost interactive leaf and its nearest
//! locator-bearing ancestor. The result depends only on the current tree
//! and the point, never on prior selection state.

use loupe_common::Point;
use loupe_dom::{Document, NodeId, OVERLAY_UI_ATTR};

/// A resolved hit: the literal element under the pointer and the nearest
/// ancestor-or-self that carries a locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub leaf: NodeId,
    pub mapped: NodeId,
}

/// Topmost-first hit test at `point`.
///
/// Candidates are restricted to descendants of the declared edit root
/// (when present), overlay chrome is self-excluded, and the first
/// candidate with a locator-bearing ancestor wins. `None` means the
/// caller must leave the current selection untouched.
pub fn hit_test(doc: &Document, point: Point) -> Option<Hit> {
    let edit_root = doc.edit_root();

    for candidate in doc.elements_at_point(point) {
        if is_overlay_ui(doc, candidate) {
            continue;
        }
        if let Some(root) = edit_root {
            if !doc.ancestors_inclusive(candidate).contains(&root) {
                continue;
            }
        }
        if let Some((mapped, _)) = doc.nearest_mapped(candidate) {
            return Some(Hit {
                leaf: candidate,
                mapped,
            });
        }
    }

    None
}

/// Part of our own overlay chrome (self or any ancestor flagged).
fn is_overlay_ui(doc: &Document, id: NodeId) -> bool {
    doc.nearest_ancestor(id, |n| n.has_attr(OVERLAY_UI_ATTR))
        .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use loupe_common::Rect;
    use loupe_dom::{NodePayload, EDIT_ROOT_ATTR, SOURCE_FILE_ATTR, SOURCE_LINE_ATTR};

    fn mapped(tag: &str, line: u32, rect: Rect) -> NodePayload {
        let mut p = NodePayload::new(tag);
        p.attributes
            .insert(SOURCE_FILE_ATTR.to_string(), "App.tsx".to_string());
        p.attributes
            .insert(SOURCE_LINE_ATTR.to_string(), line.to_string());
        p.layout.rect = rect;
        p
    }

    fn unmapped(tag: &str, rect: Rect) -> NodePayload {
        let mut p = NodePayload::new(tag);
        p.layout.rect = rect;
        p
    }

    fn build() -> Document {
        // main[edit-root] > section(mapped) > span(unmapped)
        //                 > overlay(ui)     > handle
        let mut root = mapped("main", 1, Rect::new(0.0, 0.0, 800.0, 600.0));
        root.attributes
            .insert(EDIT_ROOT_ATTR.to_string(), "true".to_string());

        let mut section = mapped("section", 5, Rect::new(0.0, 0.0, 400.0, 200.0));
        section
            .children
            .push(unmapped("span", Rect::new(10.0, 10.0, 50.0, 20.0)));

        let mut overlay = unmapped("div", Rect::new(0.0, 0.0, 800.0, 600.0));
        overlay
            .attributes
            .insert(OVERLAY_UI_ATTR.to_string(), "true".to_string());
        overlay
            .children
            .push(unmapped("div", Rect::new(10.0, 10.0, 8.0, 8.0)));

        root.children.push(section);
        root.children.push(overlay);

        let mut doc = Document::empty();
        doc.replace("App.tsx", vec![root]);
        doc
    }

    #[test]
    fn test_hit_resolves_leaf_and_mapped_ancestor() {
        let doc = build();
        let hit = hit_test(&doc, Point::new(12.0, 12.0)).unwrap();
        assert_eq!(doc.get(hit.leaf).unwrap().tag, "span");
        assert_eq!(doc.get(hit.mapped).unwrap().tag, "section");
    }

    #[test]
    fn test_overlay_chrome_is_skipped() {
        // The overlay and its handle sit above everything at this point,
        // but must never be selected
        let doc = build();
        let hit = hit_test(&doc, Point::new(300.0, 100.0)).unwrap();
        assert_eq!(doc.get(hit.leaf).unwrap().tag, "section");
    }

    #[test]
    fn test_miss_returns_none() {
        let doc = build();
        // Outside everything
        assert!(hit_test(&doc, Point::new(2000.0, 2000.0)).is_none());
    }

    #[test]
    fn test_unmapped_tree_returns_none() {
        let mut doc = Document::empty();
        doc.replace(
            "App.tsx",
            vec![unmapped("div", Rect::new(0.0, 0.0, 100.0, 100.0))],
        );
        assert!(hit_test(&doc, Point::new(50.0, 50.0)).is_none());
    }

    #[test]
    fn test_self_mapped_leaf() {
        let doc = build();
        // Hitting the section away from the span: leaf == mapped
        let hit = hit_test(&doc, Point::new(300.0, 150.0)).unwrap();
        assert_eq!(hit.leaf, hit.mapped);
    }
}
