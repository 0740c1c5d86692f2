//! Engine configuration.
//!
//! The traversal and labeling heuristics live here as ordered data tables
//! rather than hard-coded conditionals, so they can be tuned per project
//! and unit-tested without a rendered document.

use crate::groups::SelectionMode;
use serde::{Deserialize, Serialize};

/// One labeling rule: if any class name contains `pattern`, the crumb is
/// labeled `label`. Rules are tried in order; first match wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelRule {
    pub pattern: String,
    pub label: String,
}

impl LabelRule {
    pub fn new(pattern: &str, label: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Selection mode used for plain (unmodified) clicks.
    pub selection_mode: SelectionMode,

    /// Breadcrumb trail cap; earliest non-endpoint entries drop first.
    pub max_breadcrumbs: usize,

    /// Arrow-key nudge distances, px.
    pub nudge_step: f64,
    pub nudge_step_large: f64,

    /// Quiet window before nudges persist, ms.
    pub nudge_debounce_ms: u64,

    /// Resize clamp: width/height never go below this, px.
    pub min_resize_size: f64,

    /// Cap for trimmed text previews in element context.
    pub text_preview_len: usize,

    /// Cap for locator-bearing ancestors in element context.
    pub max_context_ancestors: usize,

    /// Ordered class-pattern → label table for breadcrumbs.
    pub label_rules: Vec<LabelRule>,

    /// Class patterns that make an ancestor "important" enough to keep in
    /// the breadcrumb trail.
    pub container_vocabulary: Vec<String>,

    /// Class patterns that make a declared group root read as a scroll box.
    pub scroll_vocabulary: Vec<String>,

    /// Computed-style properties included in element context snapshots,
    /// and the only non-geometry properties previews may touch.
    pub style_allow_list: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            selection_mode: SelectionMode::Element,
            max_breadcrumbs: 6,
            nudge_step: 1.0,
            nudge_step_large: 10.0,
            nudge_debounce_ms: 250,
            min_resize_size: 4.0,
            text_preview_len: 80,
            max_context_ancestors: 10,
            label_rules: vec![
                LabelRule::new("scroll", "scroll box"),
                LabelRule::new("list", "list"),
                LabelRule::new("card", "card"),
                LabelRule::new("container", "container"),
                LabelRule::new("section", "section"),
                LabelRule::new("nav", "navigation"),
                LabelRule::new("hero", "hero"),
                LabelRule::new("footer", "footer"),
                LabelRule::new("header", "header"),
            ],
            container_vocabulary: vec![
                "container".to_string(),
                "scroll".to_string(),
                "list".to_string(),
                "card".to_string(),
                "grid".to_string(),
                "section".to_string(),
            ],
            scroll_vocabulary: vec!["scroll".to_string(), "carousel".to_string()],
            style_allow_list: vec![
                "display".to_string(),
                "position".to_string(),
                "width".to_string(),
                "height".to_string(),
                "margin".to_string(),
                "padding".to_string(),
                "color".to_string(),
                "background-color".to_string(),
                "font-size".to_string(),
                "font-weight".to_string(),
                "font-family".to_string(),
                "line-height".to_string(),
                "text-align".to_string(),
                "border-radius".to_string(),
                "opacity".to_string(),
                "flex-direction".to_string(),
                "justify-content".to_string(),
                "align-items".to_string(),
                "gap".to_string(),
            ],
        }
    }
}

impl EngineConfig {
    /// The closed set of properties a style write may touch: the gesture
    /// geometry channel plus the preview allow-list.
    pub fn is_writable_property(&self, property: &str) -> bool {
        matches!(property, "width" | "height" | "transform")
            || self.style_allow_list.iter().any(|p| p == property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_breadcrumbs, 6);
        assert_eq!(config.nudge_debounce_ms, 250);
        assert_eq!(config.min_resize_size, 4.0);
        assert_eq!(config.selection_mode, SelectionMode::Element);
    }

    #[test]
    fn test_writable_property_is_a_closed_set() {
        let config = EngineConfig::default();
        assert!(config.is_writable_property("transform"));
        assert!(config.is_writable_property("width"));
        assert!(config.is_writable_property("background-color"));
        assert!(!config.is_writable_property("behavior"));
        assert!(!config.is_writable_property("-moz-binding"));
    }

    #[test]
    fn test_config_deserializes_with_overrides() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"maxBreadcrumbs": 4, "nudgeDebounceMs": 100}"#).unwrap();
        assert_eq!(config.max_breadcrumbs, 4);
        assert_eq!(config.nudge_debounce_ms, 100);
        // Untouched fields keep defaults
        assert_eq!(config.nudge_step, 1.0);
    }
}
