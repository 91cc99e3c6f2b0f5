//! The client-local working copy of one verse.
//!
//! A draft is created fresh when a work is selected or "new verse" is
//! invoked, replaced wholesale when an existing verse loads, and discarded on
//! navigation away. It is never incrementally patched from the server; the
//! only post-construction server write-back is adopting the id assigned by a
//! successful create.

use std::collections::BTreeMap;

use crate::commentary::CommentaryEntry;
use crate::language::{resolve_universe, DEFAULT_CANONICAL_LANG};
use crate::review::{
    default_required_reviewers, ReviewHistoryEntry, ReviewState,
};
use crate::verse::{AttachmentRef, OriginEntry, VerseRecord};
use crate::work::WorkDetail;

/// Mutable editing state for a single verse.
///
/// Invariant: every language in the draft's universe has a key in both
/// `texts` and `segments`. `status` only changes through a successful review
/// transition response or a load; `verse_id` is write-once.
#[derive(Debug, Clone, PartialEq)]
pub struct VerseDraft {
    verse_id: Option<String>,
    pub manual_number: String,
    pub system_order: Option<i64>,
    pub texts: BTreeMap<String, String>,
    pub segments: BTreeMap<String, Vec<String>>,
    pub tags: Vec<String>,
    pub origin: Vec<OriginEntry>,
    pub status: ReviewState,
    pub review_required: Vec<String>,
    pub commentary: Vec<CommentaryEntry>,
    pub history: Vec<ReviewHistoryEntry>,
    pub attachments: Vec<AttachmentRef>,
    universe: Vec<String>,
}

impl VerseDraft {
    /// Fresh draft for a work (or no work at all).
    ///
    /// Every universe language starts with empty text and no segments. The
    /// origin list is seeded with the work's first source edition at page 1,
    /// paragraph 1 when one exists.
    pub fn for_work(work: Option<&WorkDetail>) -> Self {
        let canonical = work
            .map(|w| w.canonical_lang.as_str())
            .unwrap_or(DEFAULT_CANONICAL_LANG);
        let work_langs: Vec<&str> = work
            .map(|w| w.langs.iter().map(String::as_str).collect())
            .unwrap_or_default();
        let universe = resolve_universe(canonical, work_langs, []);

        let mut texts = BTreeMap::new();
        let mut segments = BTreeMap::new();
        for lang in &universe {
            texts.insert(lang.clone(), String::new());
            segments.insert(lang.clone(), Vec::new());
        }

        let origin = work
            .and_then(|w| w.primary_edition())
            .map(|edition| vec![OriginEntry::first_page(edition.id.as_str())])
            .unwrap_or_default();

        Self {
            verse_id: None,
            manual_number: String::new(),
            system_order: None,
            texts,
            segments,
            tags: Vec::new(),
            origin,
            status: ReviewState::Draft,
            review_required: default_required_reviewers(),
            commentary: Vec::new(),
            history: Vec::new(),
            attachments: Vec::new(),
            universe,
        }
    }

    /// Draft for an existing verse fetched from the server.
    ///
    /// The universe is re-resolved to include any language keys the record
    /// carries, so legacy languages survive a load/re-save cycle. `null`
    /// texts become `""` for editing; the review block is taken verbatim.
    pub fn from_record(record: &VerseRecord, work: Option<&WorkDetail>) -> Self {
        let canonical = work
            .map(|w| w.canonical_lang.as_str())
            .unwrap_or(DEFAULT_CANONICAL_LANG);
        let work_langs: Vec<&str> = work
            .map(|w| w.langs.iter().map(String::as_str).collect())
            .unwrap_or_default();
        let record_langs: Vec<&str> = record
            .texts
            .keys()
            .chain(record.segments.keys())
            .map(String::as_str)
            .collect();
        let universe = resolve_universe(canonical, work_langs, record_langs);

        let mut texts = BTreeMap::new();
        let mut segments = BTreeMap::new();
        for lang in &universe {
            let text = record
                .texts
                .get(lang)
                .and_then(|t| t.clone())
                .unwrap_or_default();
            texts.insert(lang.clone(), text);
            segments.insert(lang.clone(), record.segments.get(lang).cloned().unwrap_or_default());
        }

        Self {
            verse_id: Some(record.verse_id.clone()),
            manual_number: record.number_manual.clone().unwrap_or_default(),
            system_order: record.order,
            texts,
            segments,
            tags: record.tags.clone(),
            origin: record.origin.clone(),
            status: record.review.state,
            review_required: record.review.required_reviewers.clone(),
            commentary: Vec::new(),
            history: record.review.history.clone(),
            attachments: record.attachments.clone(),
            universe,
        }
    }

    pub fn verse_id(&self) -> Option<&str> {
        self.verse_id.as_deref()
    }

    /// Whether this draft has been persisted at least once.
    pub fn is_saved(&self) -> bool {
        self.verse_id.is_some()
    }

    /// Adopt the server-assigned id after a successful create.
    ///
    /// A draft that already has an id keeps it; switching verses constructs a
    /// new draft instead of re-pointing this one.
    pub fn adopt_verse_id(&mut self, verse_id: impl Into<String>) {
        if self.verse_id.is_none() {
            self.verse_id = Some(verse_id.into());
        }
    }

    /// The ordered language universe this draft tracks.
    pub fn universe(&self) -> &[String] {
        &self.universe
    }

    pub fn text(&self, lang: &str) -> &str {
        self.texts.get(lang).map(String::as_str).unwrap_or("")
    }

    pub fn set_manual_number(&mut self, value: impl Into<String>) {
        self.manual_number = value.into();
    }

    /// Set a language's text, growing the universe if the language is new.
    pub fn set_text(&mut self, lang: &str, value: impl Into<String>) {
        self.ensure_language(lang);
        self.texts.insert(lang.to_string(), value.into());
    }

    /// Replace a language's segment list.
    pub fn set_segments(&mut self, lang: &str, segments: Vec<String>) {
        self.ensure_language(lang);
        self.segments.insert(lang.to_string(), segments);
    }

    fn ensure_language(&mut self, lang: &str) {
        if !self.universe.iter().any(|known| known == lang) {
            self.universe.push(lang.to_string());
        }
        self.texts.entry(lang.to_string()).or_default();
        self.segments.entry(lang.to_string()).or_default();
    }

    /// Add tags from raw input; comma-separated tokens are split, trimmed,
    /// and deduplicated while preserving first-seen order.
    pub fn add_tags(&mut self, raw: &str) {
        for token in raw.split(',') {
            let tag = token.trim();
            if !tag.is_empty() && !self.tags.iter().any(|known| known == tag) {
                self.tags.push(tag.to_string());
            }
        }
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|known| known != tag);
    }

    pub fn add_origin(&mut self, entry: OriginEntry) {
        self.origin.push(entry);
    }

    /// Replace one origin entry; out-of-range indices are ignored.
    pub fn update_origin(&mut self, index: usize, entry: OriginEntry) {
        if let Some(slot) = self.origin.get_mut(index) {
            *slot = entry;
        }
    }

    pub fn remove_origin(&mut self, index: usize) {
        if index < self.origin.len() {
            self.origin.remove(index);
        }
    }

    pub fn add_attachment(&mut self, attachment: AttachmentRef) {
        self.attachments.push(attachment);
    }

    pub fn update_attachment(&mut self, index: usize, attachment: AttachmentRef) {
        if let Some(slot) = self.attachments.get_mut(index) {
            *slot = attachment;
        }
    }

    pub fn remove_attachment(&mut self, index: usize) {
        if index < self.attachments.len() {
            self.attachments.remove(index);
        }
    }
}

/// Manual number for the next verse after save-and-advance.
///
/// Numeric values increment; anything else passes through unchanged so the
/// editor never invents numbering schemes.
pub fn next_manual_number(current: &str) -> String {
    match current.trim().parse::<i64>() {
        Ok(value) => (value + 1).to_string(),
        Err(_) => current.to_string(),
    }
}

/// Split one segment in place at sentence boundaries.
///
/// Newlines take precedence; otherwise the text splits after `.`, `?`, or
/// `!`. A segment that yields fewer than two pieces is left untouched.
pub fn split_segment(segments: &mut Vec<String>, index: usize) {
    let Some(value) = segments.get(index) else {
        return;
    };
    let pieces: Vec<String> = if value.contains('\n') {
        value
            .split('\n')
            .map(|piece| piece.trim().to_string())
            .filter(|piece| !piece.is_empty())
            .collect()
    } else {
        split_sentences(value)
    };
    if pieces.len() <= 1 {
        return;
    }
    segments.splice(index..=index, pieces);
}

/// Merge a segment with the one after it, joined by a single space.
pub fn merge_segment_down(segments: &mut Vec<String>, index: usize) {
    if index + 1 >= segments.len() {
        return;
    }
    let tail = segments.remove(index + 1);
    let merged = format!("{} {}", segments[index], tail).trim().to_string();
    segments[index] = merged;
}

/// Sentence-split a language's full text into fresh segments.
pub fn autofill_segments(text: &str) -> Vec<String> {
    split_sentences(text)
}

fn split_sentences(text: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        current.push(ch);
        if matches!(ch, '.' | '?' | '!') {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                pieces.push(trimmed.to_string());
            }
            current.clear();
        }
    }
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        pieces.push(trimmed.to_string());
    }
    pieces
}
