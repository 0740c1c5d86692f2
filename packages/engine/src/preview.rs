//! # Preview Patches
//!
//! Temporary inline style overrides driven by the host (`previewStyle`),
//! restorable to the exact prior state (`clearPreview`). The original
//! value of each `(locator, property)` pair is recorded exactly once:
//! repeated previews of the same property keep the first original, so a
//! preview/clear round-trip restores the pre-preview document no matter
//! how many previews happened in between.

use crate::config::EngineConfig;
use loupe_common::SourceLocator;
use loupe_dom::Document;
use std::collections::HashMap;

/// Recorded original inline values. `None` means the property was not
/// declared inline before the first preview touched it.
#[derive(Debug, Default)]
pub struct PreviewSet {
    saved: HashMap<(SourceLocator, String), Option<String>>,
}

impl PreviewSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }

    /// Apply a preview to the element matching `(file, line)`. Properties
    /// outside the engine's closed writable set are ignored at this
    /// boundary. Unknown locators are a silent no-op.
    pub fn apply(
        &mut self,
        doc: &mut Document,
        config: &EngineConfig,
        file: &str,
        line: u32,
        style: &HashMap<String, String>,
    ) {
        let Some(node) = doc.find_by_line(file, line) else {
            tracing::debug!(file, line, "preview target not found");
            return;
        };
        let locator = SourceLocator::new(file, line);

        for (property, value) in style {
            if !config.is_writable_property(property) {
                tracing::debug!(property, "preview property outside writable set, ignored");
                continue;
            }
            let key = (locator.clone(), property.clone());
            // First touch records the original; later touches keep it
            self.saved
                .entry(key)
                .or_insert_with(|| doc.inline_style(node, property));
            let _ = doc.set_inline_style(node, property, value);
        }
    }

    /// Restore every recorded original and empty the set.
    pub fn clear(&mut self, doc: &mut Document) {
        for ((locator, property), original) in self.saved.drain() {
            let Some(node) = doc.find_by_locator(&locator) else {
                continue;
            };
            match original {
                Some(value) => {
                    let _ = doc.set_inline_style(node, &property, &value);
                }
                None => {
                    let _ = doc.remove_inline_style(node, &property);
                }
            }
        }
    }

    /// Drop all recorded originals without touching the tree. Used on
    /// document replacement, when the old nodes are gone anyway.
    pub fn reset(&mut self) {
        self.saved.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loupe_common::Rect;
    use loupe_dom::{NodePayload, SOURCE_FILE_ATTR, SOURCE_LINE_ATTR};

    fn mapped(line: u32, inline: &[(&str, &str)]) -> NodePayload {
        let mut p = NodePayload::new("div");
        p.attributes
            .insert(SOURCE_FILE_ATTR.to_string(), "App.tsx".to_string());
        p.attributes
            .insert(SOURCE_LINE_ATTR.to_string(), line.to_string());
        for (k, v) in inline {
            p.inline_styles.insert(k.to_string(), v.to_string());
        }
        p.layout.rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        p
    }

    fn style(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_round_trip_restores_exact_values() {
        let mut doc = Document::empty();
        doc.replace(
            "App.tsx",
            vec![mapped(3, &[("color", "red")]), mapped(7, &[])],
        );
        let a = doc.iter()[0];
        let b = doc.iter()[1];
        let config = EngineConfig::default();
        let mut previews = PreviewSet::new();

        previews.apply(&mut doc, &config, "App.tsx", 3, &style(&[("color", "blue")]));
        previews.apply(&mut doc, &config, "App.tsx", 3, &style(&[("color", "green")]));
        previews.apply(&mut doc, &config, "App.tsx", 7, &style(&[("width", "50px")]));
        assert_eq!(doc.inline_style(a, "color").as_deref(), Some("green"));
        assert_eq!(doc.inline_style(b, "width").as_deref(), Some("50px"));

        previews.clear(&mut doc);
        // Declared value restored exactly; undeclared property removed
        assert_eq!(doc.inline_style(a, "color").as_deref(), Some("red"));
        assert_eq!(doc.inline_style(b, "width"), None);
        assert!(previews.is_empty());
    }

    #[test]
    fn test_properties_outside_closed_set_ignored() {
        let mut doc = Document::empty();
        doc.replace("App.tsx", vec![mapped(3, &[])]);
        let a = doc.iter()[0];
        let config = EngineConfig::default();
        let mut previews = PreviewSet::new();

        previews.apply(
            &mut doc,
            &config,
            "App.tsx",
            3,
            &style(&[("behavior", "url(evil)"), ("color", "blue")]),
        );
        assert_eq!(doc.inline_style(a, "behavior"), None);
        assert_eq!(doc.inline_style(a, "color").as_deref(), Some("blue"));
    }

    #[test]
    fn test_unknown_locator_is_noop() {
        let mut doc = Document::empty();
        doc.replace("App.tsx", vec![mapped(3, &[])]);
        let mut previews = PreviewSet::new();
        previews.apply(
            &mut doc,
            &EngineConfig::default(),
            "Other.tsx",
            99,
            &style(&[("color", "blue")]),
        );
        assert!(previews.is_empty());
    }

    #[test]
    fn test_reset_drops_without_restoring() {
        let mut doc = Document::empty();
        doc.replace("App.tsx", vec![mapped(3, &[("color", "red")])]);
        let a = doc.iter()[0];
        let config = EngineConfig::default();
        let mut previews = PreviewSet::new();

        previews.apply(&mut doc, &config, "App.tsx", 3, &style(&[("color", "blue")]));
        previews.reset();
        previews.clear(&mut doc);
        // Reset means no restore happens
        assert_eq!(doc.inline_style(a, "color").as_deref(), Some("blue"));
    }
}
