//! # Loupe Protocol
//!
//! The edit-bridge message contract between the host (the process that
//! owns source files and renders documents) and the editing surface.
//!
//! Messages are JSON records discriminated by a `command` field.
//! Unrecognized or malformed inbound messages are dropped by the engine,
//! never surfaced as errors.
//!
//! ## Guarantee
//!
//! Every outbound persistence message ([`SurfaceMessage::UpdateStyle`],
//! [`SurfaceMessage::UpdateText`]) carries a fully resolved
//! `(file, line)`. If a selection or edit cannot resolve a locator the
//! engine sends nothing at all.

pub mod context;
pub mod messages;

pub use context::*;
pub use messages::*;
