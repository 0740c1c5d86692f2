//! # Source Locators
//!
//! The minimal addressable unit of the whole system: an element in the
//! rendered tree tagged with the source position it was compiled from.
//! A locator is the identity key for persistence: two elements sharing a
//! locator are the same edit target.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source position stamped onto a rendered element by the upstream compiler.
///
/// Immutable once read from an element's attributes. Every outbound
/// persistence message must carry one of these fully resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocator {
    /// Source file the element came from (e.g. "App.tsx")
    pub file: String,

    /// 1-based line number
    pub line: u32,

    /// Optional 0-based column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

impl SourceLocator {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column: None,
        }
    }

    pub fn with_column(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column: Some(column),
        }
    }

    /// Same source file and line (column ignored). Used when matching a
    /// `(file, line)` pair arriving over the bridge against tree elements.
    pub fn matches_line(&self, file: &str, line: u32) -> bool {
        self.file == file && self.line == line
    }
}

impl fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.column {
            Some(col) => write!(f, "{}:{}:{}", self.file, self.line, col),
            None => write!(f, "{}:{}", self.file, self.line),
        }
    }
}
