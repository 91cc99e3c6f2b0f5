//! Works and their source editions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::language::DEFAULT_CANONICAL_LANG;

/// Listing entry returned by `GET /works`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkSummary {
    pub work_id: String,
    /// Per-language titles; absent translations are explicit nulls.
    #[serde(default)]
    pub title: BTreeMap<String, Option<String>>,
    #[serde(default)]
    pub langs: Vec<String>,
}

impl WorkSummary {
    /// Best display title: English, then Bengali, then the work id.
    pub fn display_title(&self) -> &str {
        self.title
            .get("en")
            .and_then(|t| t.as_deref())
            .or_else(|| self.title.get("bn").and_then(|t| t.as_deref()))
            .unwrap_or(&self.work_id)
    }
}

/// A physical or digital edition a verse's origin entries can point into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceEdition {
    pub id: String,
    pub lang: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<String>,
}

/// Full work record returned by `GET /works/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkDetail {
    pub work_id: String,
    #[serde(default)]
    pub title: BTreeMap<String, Option<String>>,
    #[serde(default)]
    pub langs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default = "default_canonical")]
    pub canonical_lang: String,
    #[serde(default)]
    pub source_editions: Vec<SourceEdition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure: Option<BTreeMap<String, Option<String>>>,
}

fn default_canonical() -> String {
    DEFAULT_CANONICAL_LANG.to_string()
}

impl WorkDetail {
    /// The edition new origin entries default to (first declared edition).
    pub fn primary_edition(&self) -> Option<&SourceEdition> {
        self.source_editions.first()
    }

    pub fn display_title(&self) -> &str {
        self.title
            .get("en")
            .and_then(|t| t.as_deref())
            .or_else(|| self.title.get("bn").and_then(|t| t.as_deref()))
            .unwrap_or(&self.work_id)
    }
}
