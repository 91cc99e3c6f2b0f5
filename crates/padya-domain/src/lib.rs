//! Domain types for multilingual verse editing and review
//!
//! This crate provides the canonical domain models for the padya verse
//! content platform:
//! - Work: a literary work with a canonical language and source editions
//! - Verse: one verse record with per-language texts, segments, and provenance
//! - VerseDraft: the client-local, mutable working copy of one verse
//! - Review workflow: states, history, and reviewer-supplied issues
//! - Language universe: the full set of language codes a work's verses track

pub mod commentary;
pub mod draft;
pub mod language;
pub mod review;
pub mod validation;
pub mod verse;
pub mod work;

pub use commentary::*;
pub use draft::*;
pub use language::*;
pub use review::*;
pub use validation::*;
pub use verse::*;
pub use work::*;
