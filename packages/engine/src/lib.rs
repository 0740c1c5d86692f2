//! # Loupe Engine
//!
//! The live selection & manipulation core: hit-testing, group/element
//! selection resolution, breadcrumb derivation, overlay-geometry
//! tracking, drag/resize transform math, in-place text editing, and
//! dispatch of the edit-bridge protocol.
//!
//! Everything hangs off an [`EditorSession`]: one session per editing
//! surface, with an explicit open/close lifecycle. The session is
//! single-threaded and event-driven; hosts feed it pointer/key events,
//! bridge messages, animation frames ([`EditorSession::run_frame`]) and
//! wall-clock time ([`EditorSession::advance`]), and drain outbound
//! messages from its outbox. No callback ever re-enters the session.
//!
//! ## Failure philosophy
//!
//! Nothing in this crate is fatal to the host. Unresolvable selections
//! no-op, disconnected selections go inert, unparsable transforms read as
//! `(0, 0)`, persistence without a locator is silently skipped, and
//! malformed inbound messages are dropped. Recovery is always a fresh
//! selection or a document reload.

pub mod breadcrumbs;
pub mod config;
pub mod context;
pub mod events;
pub mod gestures;
pub mod groups;
pub mod hit_test;
pub mod overlay;
pub mod preview;
pub mod selection;
pub mod session;
pub mod text_edit;
pub mod transform;

pub use breadcrumbs::Breadcrumb;
pub use config::{EngineConfig, LabelRule};
pub use events::{Key, KeyEvent, Modifiers, PointerEvent};
pub use groups::SelectionMode;
pub use hit_test::{hit_test, Hit};
pub use selection::SelectionModel;
pub use session::EditorSession;
