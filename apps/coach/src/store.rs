//! File-backed session persistence.
//!
//! One JSON record per data directory under a fixed storage key, overwritten
//! after every mutation and removed on reset. A record whose shape no longer
//! deserializes is discarded and the session starts over from `Setup`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::warn;

use crate::session::Session;

/// Fixed storage key for the single persisted session record.
pub const STORAGE_KEY: &str = "interviewPrepSession";

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(format!("{STORAGE_KEY}.json")),
        }
    }

    /// Loads the persisted session, if any. Unreadable or shape-incompatible
    /// records are discarded (logged at warn), not partially recovered.
    pub fn load(&self) -> Option<Session> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("failed to read session record {}: {e}", self.path.display());
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!(
                    "discarding incompatible session record {}: {e}",
                    self.path.display()
                );
                None
            }
        }
    }

    /// Serializes the full session and overwrites the record.
    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Removes the record. Missing file counts as already cleared.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{reduce, Role, Session, SessionAction, QUESTION_COUNT};

    fn sample_session() -> Session {
        let questions = (0..QUESTION_COUNT).map(|i| format!("Q{i}?")).collect();
        reduce(
            Session {
                role: Some(Role::Designer),
                resume: "resume".to_string(),
                short_blurb: "blurb".to_string(),
                job_description: "jd".to_string(),
                ..Session::default()
            },
            SessionAction::StartInterview { questions },
        )
    }

    #[test]
    fn test_load_missing_record_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        assert!(store.load().is_none());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        let session = sample_session();
        store.save(&session).unwrap();
        assert_eq!(store.load(), Some(session));
    }

    #[test]
    fn test_incompatible_shape_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        let path = dir.path().join(format!("{STORAGE_KEY}.json"));
        // questions must be a list of strings; a future schema storing an
        // object here fails deserialization and the record is dropped
        fs::write(&path, r#"{"questions": {"v2": true}}"#).unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_unparsable_record_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        let path = dir.path().join(format!("{STORAGE_KEY}.json"));
        fs::write(&path, "not json at all").unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_clear_removes_record_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        store.save(&sample_session()).unwrap();
        store.clear().unwrap();
        assert!(store.load().is_none());
        store.clear().unwrap();
    }
}
