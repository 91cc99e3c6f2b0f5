//! REST client for the padya content API
//!
//! Thin typed wrapper over the HTTP surface: works, verses, commentary,
//! review transitions, and a health probe. All verse/review semantics live
//! in `padya-domain` and `padya-editor`; this crate only moves their types
//! over the wire and normalizes errors into one user-presentable message.

pub mod client;
pub mod error;

pub use client::{ApiClient, AuthUser};
pub use error::ClientError;
