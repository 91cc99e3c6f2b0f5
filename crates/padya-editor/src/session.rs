//! The editing session for one open verse.
//!
//! `EditorSession` owns the draft plus the flags that serialize saves and
//! review transitions. It is transport-free: callers (the UI shell, the
//! autosave task) ask it for payloads, perform the HTTP call themselves, and
//! report the outcome back. A failed call therefore never corrupts the draft;
//! reconciliation only happens from a server-returned record.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use padya_domain::commentary::CommentaryEntry;
use padya_domain::draft::{next_manual_number, VerseDraft};
use padya_domain::language::visible_languages;
use padya_domain::review::{
    sanitize_issues, ReviewAction, ReviewHistoryIssue, ReviewRequest,
};
use padya_domain::validation::{validate_draft, ValidationError};
use padya_domain::verse::VerseRecord;
use padya_domain::work::WorkDetail;

use crate::payload::{build_payload, PayloadError, SavePayload};
use crate::policy::{can_perform, role_level};
use crate::prefs::PreferenceStore;

/// Why a save or review transition could not be started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error("a save is already in flight")]
    SaveInFlight,
    #[error("a review action is already in flight")]
    ReviewInFlight,
    #[error("verse must be saved before review actions")]
    NotSaved,
    #[error("draft has validation problems")]
    Invalid,
    #[error("insufficient role for {action}")]
    Forbidden { action: ReviewAction },
}

/// Successful save outcome reported back by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveSuccess {
    /// Id assigned by the server; `Some` only for a create.
    pub verse_id: Option<String>,
    pub at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct EditorSession {
    work: Option<WorkDetail>,
    draft: VerseDraft,
    roles: Vec<String>,
    dirty: bool,
    is_saving: bool,
    is_review_processing: bool,
    last_saved_at: Option<DateTime<Utc>>,
    error: Option<String>,
    banners: Vec<String>,
    preferred_lang: Option<String>,
    expanded_langs: Vec<String>,
}

impl EditorSession {
    pub fn new(roles: Vec<String>) -> Self {
        Self {
            work: None,
            draft: VerseDraft::for_work(None),
            roles,
            dirty: false,
            is_saving: false,
            is_review_processing: false,
            last_saved_at: None,
            error: None,
            banners: Vec::new(),
            preferred_lang: None,
            expanded_langs: Vec::new(),
        }
    }

    pub fn work(&self) -> Option<&WorkDetail> {
        self.work.as_ref()
    }

    pub fn draft(&self) -> &VerseDraft {
        &self.draft
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_saving(&self) -> bool {
        self.is_saving
    }

    pub fn is_review_processing(&self) -> bool {
        self.is_review_processing
    }

    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.last_saved_at
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Drain queued one-shot notifications (e.g. "Saved").
    pub fn take_banners(&mut self) -> Vec<String> {
        std::mem::take(&mut self.banners)
    }

    /// Switch works: the draft is replaced wholesale, edits are discarded.
    /// The preferred language is per work, so it resets too; call
    /// [`restore_preference`](Self::restore_preference) to pick up the new
    /// work's remembered value.
    pub fn select_work(&mut self, work: Option<WorkDetail>) {
        self.draft = VerseDraft::for_work(work.as_ref());
        self.work = work;
        self.dirty = false;
        self.error = None;
        self.preferred_lang = None;
        self.expanded_langs.clear();
    }

    /// Reset to an empty draft for the current work.
    pub fn new_verse(&mut self) {
        self.draft = VerseDraft::for_work(self.work.as_ref());
        self.dirty = false;
        self.error = None;
    }

    /// Replace the draft with a freshly fetched record.
    ///
    /// A failed fetch never reaches this method, so the previous draft stays
    /// intact on load errors.
    pub fn load_record(&mut self, record: &VerseRecord) {
        self.draft = VerseDraft::from_record(record, self.work.as_ref());
        self.dirty = false;
        self.error = None;
        self.expanded_langs.clear();
    }

    /// Mutate the draft through a closure; any edit marks the session dirty.
    pub fn edit(&mut self, f: impl FnOnce(&mut VerseDraft)) {
        f(&mut self.draft);
        self.dirty = true;
    }

    pub fn validation_errors(&self) -> Vec<ValidationError> {
        validate_draft(&self.draft, self.work.as_ref())
    }

    /// Build the save payload for the current draft.
    pub fn payload(&self) -> Result<SavePayload, PayloadError> {
        let work = self.work.as_ref().ok_or(PayloadError::NoWorkSelected)?;
        build_payload(&self.draft, work)
    }

    /// Start an explicit save. Rejects overlap with an in-flight save and
    /// surfaces payload problems to the caller.
    pub fn begin_save(&mut self) -> Result<SavePayload, SessionError> {
        if self.is_saving {
            return Err(SessionError::SaveInFlight);
        }
        let payload = self.payload()?;
        self.is_saving = true;
        Ok(payload)
    }

    /// Start an autosave tick. Returns `None` when there is nothing to do:
    /// clean draft, save already in flight, or a draft that does not validate
    /// (autosave never surfaces validation errors).
    pub fn begin_autosave(&mut self) -> Option<SavePayload> {
        if !self.dirty || self.is_saving || self.is_review_processing {
            return None;
        }
        match self.payload() {
            Ok(payload) => {
                self.is_saving = true;
                Some(payload)
            }
            Err(err) => {
                debug!(error = %err, "autosave skipped");
                None
            }
        }
    }

    /// Report the save outcome. On success the draft is patched, never
    /// replaced: only the server-assigned id (for a create) and the saved
    /// timestamp change, so edits typed during the request survive untouched.
    ///
    /// Failure surfacing depends on who asked: a user-initiated save raises
    /// a transient banner, a silent (autosave) failure only fills the inline
    /// error field so typing is never interrupted.
    pub fn finish_save(&mut self, result: Result<SaveSuccess, String>, silent: bool) {
        self.is_saving = false;
        match result {
            Ok(success) => {
                if let Some(verse_id) = success.verse_id {
                    self.draft.adopt_verse_id(verse_id);
                }
                self.last_saved_at = Some(success.at);
                self.dirty = false;
                self.error = None;
                if !silent {
                    self.banners.push("Saved".to_string());
                }
            }
            Err(message) => {
                if silent {
                    self.error = Some(message);
                } else {
                    self.banners.push(message);
                }
            }
        }
    }

    /// After a successful save-and-advance: fresh draft whose manual number
    /// is the increment of the one just saved.
    pub fn advance_to_next(&mut self) {
        let next = next_manual_number(&self.draft.manual_number);
        self.draft = VerseDraft::for_work(self.work.as_ref());
        self.draft.manual_number = next;
        self.dirty = false;
    }

    pub fn role_level(&self) -> u8 {
        role_level(&self.roles)
    }

    /// Approve is the strictest gate: reviewer role, a persisted verse, and a
    /// draft with zero validation problems.
    pub fn can_approve(&self) -> bool {
        !self.is_review_processing
            && can_perform(&self.roles, ReviewAction::Approve)
            && self.draft.is_saved()
            && self.validation_errors().is_empty()
    }

    pub fn can_reject(&self) -> bool {
        self.can_act(ReviewAction::Reject)
    }

    pub fn can_flag(&self) -> bool {
        self.can_act(ReviewAction::Flag)
    }

    pub fn can_lock(&self) -> bool {
        self.can_act(ReviewAction::Lock)
    }

    fn can_act(&self, action: ReviewAction) -> bool {
        !self.is_review_processing
            && can_perform(&self.roles, action)
            && self.draft.is_saved()
    }

    /// Start a review transition. Issues are accepted only with reject and
    /// are sanitized here; a reject whose issues all collapse to nothing
    /// still sends an empty list.
    pub fn begin_review(
        &mut self,
        action: ReviewAction,
        issues: Vec<ReviewHistoryIssue>,
    ) -> Result<ReviewRequest, SessionError> {
        if self.is_review_processing {
            return Err(SessionError::ReviewInFlight);
        }
        if !can_perform(&self.roles, action) {
            return Err(SessionError::Forbidden { action });
        }
        if !self.draft.is_saved() {
            return Err(SessionError::NotSaved);
        }
        if action == ReviewAction::Approve && !self.validation_errors().is_empty() {
            return Err(SessionError::Invalid);
        }
        let work = self.work.as_ref().ok_or(PayloadError::NoWorkSelected)?;

        self.is_review_processing = true;
        Ok(ReviewRequest {
            work_id: work.work_id.clone(),
            issues: match action {
                ReviewAction::Reject => Some(sanitize_issues(issues)),
                _ => None,
            },
        })
    }

    /// Report the transition outcome. Success reconciles the whole draft from
    /// the reloaded record; failure leaves the draft and its status as they
    /// were and raises a banner.
    pub fn finish_review(&mut self, result: Result<&VerseRecord, String>) {
        self.is_review_processing = false;
        match result {
            Ok(record) => {
                self.load_record(record);
                self.banners.push(format!(
                    "Review updated: {}",
                    record.review.state.label()
                ));
            }
            Err(message) => self.banners.push(message),
        }
    }

    /// Attach lazily fetched commentary to the open draft. Commentary is not
    /// part of the save payload, so this never marks the session dirty.
    pub fn set_commentary(&mut self, entries: Vec<CommentaryEntry>) {
        self.draft.commentary = entries;
    }

    /// Preferred editing language; falls back to the work's canonical
    /// language when unset or outside the draft's universe.
    pub fn preferred_lang(&self) -> &str {
        self.preferred_lang
            .as_deref()
            .filter(|lang| self.draft.universe().iter().any(|known| known == lang))
            .unwrap_or_else(|| {
                self.work
                    .as_ref()
                    .map(|w| w.canonical_lang.as_str())
                    .unwrap_or(padya_domain::language::DEFAULT_CANONICAL_LANG)
            })
    }

    pub fn set_preferred_lang(&mut self, lang: impl Into<String>) {
        self.preferred_lang = Some(lang.into());
    }

    /// Re-read the remembered language for the currently selected work.
    pub fn restore_preference(&mut self, store: &dyn PreferenceStore) {
        self.preferred_lang = self
            .work
            .as_ref()
            .and_then(|work| store.preferred_lang(&work.work_id));
    }

    /// Pick a language and persist it under the current work's id.
    pub fn remember_preference(&mut self, store: &mut dyn PreferenceStore, lang: &str) {
        if let Some(work) = self.work.as_ref() {
            store.set_preferred_lang(&work.work_id, lang);
        }
        self.preferred_lang = Some(lang.to_string());
    }

    pub fn expand_lang(&mut self, lang: &str) {
        if !self.expanded_langs.iter().any(|known| known == lang) {
            self.expanded_langs.push(lang.to_string());
        }
    }

    /// Collapse an editor; the language's data stays in the draft.
    pub fn collapse_lang(&mut self, lang: &str) {
        self.expanded_langs.retain(|known| known != lang);
    }

    /// Languages whose editors should be shown for the current draft.
    pub fn visible_langs(&self) -> Vec<String> {
        visible_languages(
            self.draft.universe(),
            self.preferred_lang(),
            |lang| Some(self.draft.text(lang)),
            &self.expanded_langs,
        )
    }
}
