//! Verse wire records: list items, full records, origin and attachments.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::review::{ReviewBlock, ReviewState};

/// Pointer from a verse to a page/paragraph location in a source edition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OriginEntry {
    pub edition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub para_index: Option<i64>,
}

impl OriginEntry {
    /// The conventional seed reference: page 1, paragraph 1 of an edition.
    pub fn first_page(edition: impl Into<String>) -> Self {
        Self {
            edition: edition.into(),
            page: Some(1),
            para_index: Some(1),
        }
    }
}

/// External reference link attached to a verse.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttachmentRef {
    pub label: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Minimal review info carried on list items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReviewSummary {
    #[serde(default)]
    pub state: ReviewState,
}

/// One row of the verse browser / command palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerseListItem {
    pub verse_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_manual: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<ReviewSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texts: Option<BTreeMap<String, Option<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl VerseListItem {
    /// State shown in the navigator badge; unreviewed items read as drafts.
    pub fn state(&self) -> ReviewState {
        self.review.map(|r| r.state).unwrap_or_default()
    }

    /// Label shown in lists: the manual number when set, else the verse id.
    pub fn display_number(&self) -> &str {
        self.number_manual.as_deref().unwrap_or(&self.verse_id)
    }
}

/// Query parameters of `GET /works/{id}/verses`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub offset: u64,
    pub limit: u64,
    #[serde(rename = "q", default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

/// One page of a verse listing, as returned by
/// `GET /works/{id}/verses?offset&limit&q`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersePage {
    #[serde(default)]
    pub items: Vec<VerseListItem>,
    #[serde(default)]
    pub total: u64,
}

/// Full verse record returned by `GET /works/{id}/verses/{verse_id}`.
///
/// `texts` distinguishes `null` (no content for the language) from a present
/// string; the draft layer flattens both to `""` for editing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerseRecord {
    pub verse_id: String,
    pub work_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_manual: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default)]
    pub texts: BTreeMap<String, Option<String>>,
    #[serde(default)]
    pub segments: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub origin: Vec<OriginEntry>,
    #[serde(default)]
    pub review: ReviewBlock,
    #[serde(default)]
    pub attachments: Vec<AttachmentRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<BTreeMap<String, Option<String>>>,
}

/// Response body of a successful verse create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedVerse {
    pub verse_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}
