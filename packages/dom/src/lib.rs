//! # Loupe DOM
//!
//! The rendered document tree the selection engine operates on.
//!
//! The upstream compiler renders the user's source files into a tree whose
//! elements optionally carry source-locator attributes. A host delivers
//! that tree to us as structured [`NodePayload`] nodes (with layout
//! geometry stamped per node by the renderer); this crate stores it in an
//! arena [`Document`] and answers the questions the engine asks of it:
//! ancestor walks, locator lookup, point stacking, connectivity across
//! document replacement, and selector matching for target enumeration.

pub mod attrs;
pub mod document;
pub mod error;
pub mod layout;
pub mod node;
pub mod selector;

pub use attrs::*;
pub use document::{Document, NodePayload};
pub use error::DomError;
pub use layout::{Layout, Overflow};
pub use node::{Node, NodeId};
pub use selector::Selector;
