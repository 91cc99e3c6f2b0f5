//! Editing session logic for padya
//!
//! Everything between the domain types and the HTTP client lives here:
//! - SavePayload assembly from a draft (trim, null-vs-empty, origin defaults)
//! - Role policy deciding which review actions are offered
//! - EditorSession serializing saves and review transitions
//! - Autosave scheduling with a swap-in-place callback cell
//! - Verse list paging/search state
//! - Per-work preference storage
//!
//! No module here performs I/O against the API; callers wire sessions to a
//! `padya-client` and report outcomes back.

pub mod autosave;
pub mod list;
pub mod payload;
pub mod policy;
pub mod prefs;
pub mod session;

pub use autosave::{Autosave, AutosaveCell, DEFAULT_INTERVAL};
pub use list::{ListQuery, VerseListCoordinator, DEFAULT_PAGE_SIZE};
pub use payload::{build_payload, PayloadError, SavePayload};
pub use policy::{can_perform, required_level, role_level};
pub use prefs::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore, PrefsError};
pub use session::{EditorSession, SaveSuccess, SessionError};
