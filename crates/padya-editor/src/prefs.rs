//! Per-work editing preferences.
//!
//! The preferred editing language is remembered per work. The store is
//! injected so the core logic never touches the host's persistence directly;
//! a JSON file implementation is provided for desktop shells and an
//! in-memory one for tests and ephemeral sessions.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

pub trait PreferenceStore {
    /// The remembered language for a work, if any. Callers validate the
    /// value against the current language universe; a stale preference is
    /// ignored, not deleted.
    fn preferred_lang(&self, work_id: &str) -> Option<String>;

    fn set_preferred_lang(&mut self, work_id: &str, lang: &str);
}

/// Volatile store; preferences last for the process lifetime.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    langs: BTreeMap<String, String>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn preferred_lang(&self, work_id: &str) -> Option<String> {
        self.langs.get(work_id).cloned()
    }

    fn set_preferred_lang(&mut self, work_id: &str, lang: &str) {
        self.langs.insert(work_id.to_string(), lang.to_string());
    }
}

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("failed to read preferences: {0}")]
    Read(#[source] std::io::Error),
    #[error("failed to write preferences: {0}")]
    Write(#[source] std::io::Error),
    #[error("malformed preferences file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PrefsFile {
    #[serde(default)]
    preferred_langs: BTreeMap<String, String>,
}

/// JSON-file-backed store. Reads once at open; every set rewrites the file.
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    data: PrefsFile,
}

impl FilePreferenceStore {
    /// Open (or create) the preferences file. A missing file is an empty
    /// store; a malformed one is an error so user data is not clobbered.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PrefsError> {
        let path = path.into();
        let data = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => PrefsFile::default(),
            Err(err) => return Err(PrefsError::Read(err)),
        };
        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), PrefsError> {
        let raw = serde_json::to_string_pretty(&self.data)?;
        fs::write(&self.path, raw).map_err(PrefsError::Write)
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn preferred_lang(&self, work_id: &str) -> Option<String> {
        self.data.preferred_langs.get(work_id).cloned()
    }

    /// A write failure keeps the in-memory value and logs; losing a language
    /// preference is not worth interrupting an edit for.
    fn set_preferred_lang(&mut self, work_id: &str, lang: &str) {
        self.data
            .preferred_langs
            .insert(work_id.to_string(), lang.to_string());
        if let Err(err) = self.persist() {
            warn!(error = %err, path = %self.path.display(), "preference write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryPreferenceStore::new();
        assert_eq!(store.preferred_lang("W001"), None);
        store.set_preferred_lang("W001", "hi");
        store.set_preferred_lang("W002", "en");
        assert_eq!(store.preferred_lang("W001").as_deref(), Some("hi"));
        assert_eq!(store.preferred_lang("W002").as_deref(), Some("en"));
        store.set_preferred_lang("W001", "bn");
        assert_eq!(store.preferred_lang("W001").as_deref(), Some("bn"));
    }

    #[test]
    fn file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let mut store = FilePreferenceStore::open(&path).unwrap();
        assert_eq!(store.preferred_lang("W001"), None);
        store.set_preferred_lang("W001", "or");

        let reopened = FilePreferenceStore::open(&path).unwrap();
        assert_eq!(reopened.preferred_lang("W001").as_deref(), Some("or"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            FilePreferenceStore::open(&path),
            Err(PrefsError::Parse(_))
        ));
    }
}
