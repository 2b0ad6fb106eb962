//! Resource hooks for AgroStudy.
//!
//! Each hook owns the in-memory collection for one entity type, scoped to
//! the current identity, and keeps it synchronized with confirmed gateway
//! state — never optimistic beyond the point of server acknowledgment.
//! The generic engine lives in [`engine`]; the entity modules are thin
//! configurations layering on the entity-specific rules (subject-reference
//! resolution, the semester-delete conflict check, visit-photo composition,
//! the two-phase PDF delete).
//!
//! Everything here is generic over [`agrostudy_core::gateway::Gateway`];
//! no concrete backend is referenced outside of tests.

pub mod engine;
pub mod events;
pub mod library;
pub mod notes;
pub mod notify;
pub mod session;
pub mod subjects;
pub mod visits;

pub use engine::{Phase, ResourceHook};
pub use events::EventsHook;
pub use library::PdfLibraryHook;
pub use notes::NotesHook;
pub use notify::{LogNotifier, Notifier};
pub use session::{IdentityWatch, SessionStore};
pub use subjects::SubjectsHook;
pub use visits::VisitsHook;
