//! Save payload assembly.
//!
//! A draft is normalized into the wire shape the create/update endpoints
//! accept. Building is deterministic: the same draft always serializes to the
//! same bytes, so retried saves are idempotent on the wire.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use padya_domain::draft::VerseDraft;
use padya_domain::verse::{AttachmentRef, OriginEntry};
use padya_domain::work::WorkDetail;

/// Edition id used when a work declares no source editions at all.
const UNKNOWN_EDITION: &str = "UNKNOWN";

/// Body of `POST /works/{id}/verses` and `PUT /works/{id}/verses/{verse_id}`.
///
/// Every universe language is keyed in both `texts` and `segments`; a
/// language without content carries an explicit `null` text and `[]`
/// segments, which is distinct from the key being absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavePayload {
    pub number_manual: String,
    pub texts: BTreeMap<String, Option<String>>,
    pub segments: BTreeMap<String, Vec<String>>,
    pub tags: Vec<String>,
    pub origin: Vec<OriginEntry>,
    pub attachments: Vec<AttachmentRef>,
}

/// Why a draft cannot be saved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("no work selected")]
    NoWorkSelected,
    #[error("manual number is required")]
    ManualNumberRequired,
    #[error("canonical text ({lang}) is required")]
    CanonicalTextRequired { lang: String },
}

/// Normalize a draft into a save payload.
///
/// Checks run in order: manual number, canonical text. Texts are trimmed
/// with empty mapped to `None`; segments are trimmed with empties dropped;
/// an empty origin list is seeded from the work's first source edition at
/// page 1, paragraph 1.
pub fn build_payload(
    draft: &VerseDraft,
    work: &WorkDetail,
) -> Result<SavePayload, PayloadError> {
    let number_manual = draft.manual_number.trim().to_string();
    if number_manual.is_empty() {
        return Err(PayloadError::ManualNumberRequired);
    }

    let canonical = work.canonical_lang.as_str();
    if draft.text(canonical).trim().is_empty() {
        return Err(PayloadError::CanonicalTextRequired {
            lang: canonical.to_string(),
        });
    }

    let mut texts = BTreeMap::new();
    let mut segments = BTreeMap::new();
    for lang in draft.universe() {
        let trimmed = draft.text(lang).trim();
        texts.insert(
            lang.clone(),
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            },
        );

        let cleaned: Vec<String> = draft
            .segments
            .get(lang)
            .into_iter()
            .flatten()
            .map(|segment| segment.trim().to_string())
            .filter(|segment| !segment.is_empty())
            .collect();
        segments.insert(lang.clone(), cleaned);
    }

    let origin = if draft.origin.is_empty() {
        let edition = work
            .primary_edition()
            .map(|e| e.id.as_str())
            .unwrap_or(UNKNOWN_EDITION);
        vec![OriginEntry::first_page(edition)]
    } else {
        draft.origin.clone()
    };

    Ok(SavePayload {
        number_manual,
        texts,
        segments,
        tags: draft.tags.clone(),
        origin,
        attachments: draft.attachments.clone(),
    })
}
