use thiserror::Error;

/// Errors from tree operations. None of these ever cross the edit bridge;
/// the engine degrades to inert behavior instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomError {
    /// A NodeId from a previous document epoch (or a detached subtree)
    /// was passed to a mutating operation.
    #[error("Stale node id: {0}")]
    StaleNode(String),

    /// Selector text could not be parsed.
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
}
