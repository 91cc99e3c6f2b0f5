//! Commentary entries linked to verses.
//!
//! Commentary is fetched lazily when a verse loads and is never part of the
//! verse save payload.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::review::ReviewState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommentaryReview {
    #[serde(default)]
    pub state: ReviewState,
}

/// One commentary note as returned by
/// `GET /works/{id}/verses/{verse_id}/commentary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentaryEntry {
    pub commentary_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verse_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub texts: BTreeMap<String, Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<CommentaryReview>,
}

/// Form data for creating a new commentary note.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CommentaryDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub texts: BTreeMap<String, String>,
}

impl CommentaryDraft {
    /// Trim every language's text; entries stay keyed even when empty so the
    /// server records the full language set of the note.
    pub fn normalized(mut self) -> Self {
        for value in self.texts.values_mut() {
            *value = value.trim().to_string();
        }
        self
    }
}

/// Response body of a successful commentary create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedCommentary {
    pub commentary_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_trims_texts() {
        let mut draft = CommentaryDraft::default();
        draft.texts.insert("bn".to_string(), "  ভাষ্য  ".to_string());
        draft.texts.insert("en".to_string(), "   ".to_string());
        let normalized = draft.normalized();
        assert_eq!(normalized.texts["bn"], "ভাষ্য");
        assert_eq!(normalized.texts["en"], "");
    }

    #[test]
    fn entry_defaults() {
        let json = r#"{"commentary_id": "C001", "texts": {"bn": "ভাষ্য"}}"#;
        let entry: CommentaryEntry = serde_json::from_str(json).unwrap();
        assert!(entry.tags.is_empty());
        assert!(entry.review.is_none());
    }
}
