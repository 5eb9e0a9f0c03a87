//! The authoritative in-memory collection of active-work sessions.
//!
//! One store exists per running application instance. The worker flow and
//! the supervisor monitor share it through a [`SessionStoreHandle`]; there
//! is no global instance.
//!
//! The store performs no validation. The one-active-session-per-worker rule
//! is a contract of its writer (the worker flow), not of the store.

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use sarms_core::{Note, Session, SessionId};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::Result;

const SNAPSHOT_VERSION: u32 = 1;

/// Fields that may be merged into an existing session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionPatch {
    /// New flag value
    pub flagged: Option<bool>,

    /// Replacement notes sequence (read-modify-write by the caller)
    pub notes: Option<Vec<Note>>,
}

impl SessionPatch {
    /// Patch that only sets the flag.
    pub fn flagged(flagged: bool) -> Self {
        Self {
            flagged: Some(flagged),
            ..Default::default()
        }
    }

    /// Patch that only replaces the notes.
    pub fn notes(notes: Vec<Note>) -> Self {
        Self {
            notes: Some(notes),
            ..Default::default()
        }
    }

    fn apply(self, session: &mut Session) {
        if let Some(flagged) = self.flagged {
            session.flagged = flagged;
        }
        if let Some(notes) = self.notes {
            session.notes = notes;
        }
    }
}

/// Active sessions, most recent first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStore {
    sessions: Vec<Session>,
}

/// The on-disk JSON structure for a store snapshot.
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
    version: u32,
    sessions: Vec<Session>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `sessions` in the given order.
    pub fn with_sessions(sessions: Vec<Session>) -> Self {
        Self { sessions }
    }

    /// Current sessions, most recent first.
    pub fn list(&self) -> &[Session] {
        &self.sessions
    }

    /// Look up a session.
    pub fn get(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.iter().find(|s| &s.id == id)
    }

    /// Insert at the front. No uniqueness check.
    pub fn add(&mut self, session: Session) {
        debug!(session_id = %session.id, worker_id = %session.worker_id, "Session added");
        self.sessions.insert(0, session);
    }

    /// Delete the session with `id`; absent ids are ignored.
    pub fn remove(&mut self, id: &SessionId) {
        let before = self.sessions.len();
        self.sessions.retain(|s| &s.id != id);
        if self.sessions.len() == before {
            debug!(session_id = %id, "Remove ignored, session not found");
        }
    }

    /// Merge `patch` into the session with `id`. Returns false when absent.
    pub fn update(&mut self, id: &SessionId, patch: SessionPatch) -> bool {
        match self.sessions.iter_mut().find(|s| &s.id == id) {
            Some(session) => {
                patch.apply(session);
                true
            }
            None => {
                debug!(session_id = %id, "Update ignored, session not found");
                false
            }
        }
    }

    /// Number of sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Load a snapshot written by [`SessionStore::save`].
    ///
    /// Returns `Ok(None)` when the file is missing, empty, corrupt, or of an
    /// unsupported version, so the caller can fall back to a fresh store.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            warn!(path = %path.display(), "Empty session snapshot, ignoring");
            return Ok(None);
        }

        match serde_json::from_str::<SnapshotFile>(&content) {
            Ok(file) if file.version == SNAPSHOT_VERSION => Ok(Some(Self::with_sessions(file.sessions))),
            Ok(file) => {
                warn!(
                    version = file.version,
                    expected = SNAPSHOT_VERSION,
                    "Unsupported session snapshot version, ignoring"
                );
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "Corrupt session snapshot, ignoring");
                Ok(None)
            }
        }
    }

    /// Write a snapshot (temp file + rename).
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = SnapshotFile {
            version: SNAPSHOT_VERSION,
            sessions: self.sessions.clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json.as_bytes())?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

/// Shared handle to a [`SessionStore`].
///
/// Execution is single-threaded and every call borrows the store only for
/// its own duration, so calls are totally ordered.
#[derive(Debug, Clone, Default)]
pub struct SessionStoreHandle {
    inner: Rc<RefCell<SessionStore>>,
}

impl SessionStoreHandle {
    /// Wrap a store.
    pub fn new(store: SessionStore) -> Self {
        Self {
            inner: Rc::new(RefCell::new(store)),
        }
    }

    /// Copy of the current sessions, most recent first.
    pub fn list(&self) -> Vec<Session> {
        self.inner.borrow().list().to_vec()
    }

    /// Copy of one session.
    pub fn get(&self, id: &SessionId) -> Option<Session> {
        self.inner.borrow().get(id).cloned()
    }

    /// See [`SessionStore::add`].
    pub fn add(&self, session: Session) {
        self.inner.borrow_mut().add(session);
    }

    /// See [`SessionStore::remove`].
    pub fn remove(&self, id: &SessionId) {
        self.inner.borrow_mut().remove(id);
    }

    /// See [`SessionStore::update`].
    pub fn update(&self, id: &SessionId, patch: SessionPatch) -> bool {
        self.inner.borrow_mut().update(id, patch)
    }

    /// Number of sessions.
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// Replace the whole contents.
    pub fn replace(&self, store: SessionStore) {
        *self.inner.borrow_mut() = store;
    }

    /// See [`SessionStore::save`].
    pub fn save(&self, path: &Path) -> Result<()> {
        self.inner.borrow().save(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sarms_core::seed_sessions;

    fn store() -> SessionStore {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        SessionStore::with_sessions(seed_sessions(now))
    }

    #[test]
    fn test_add_prepends() {
        let mut store = store();
        let mut session = store.list()[0].clone();
        session.id = SessionId::new("s-new");
        store.add(session);

        assert_eq!(store.len(), 7);
        assert_eq!(store.list()[0].id.as_str(), "s-new");
        assert_eq!(store.list()[1].id.as_str(), "s1");
    }

    #[test]
    fn test_add_does_not_check_uniqueness() {
        let mut store = store();
        let dup = store.list()[0].clone();
        store.add(dup);
        assert_eq!(store.len(), 7);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut store = store();
        store.remove(&SessionId::new("missing"));
        assert_eq!(store.len(), 6);

        store.remove(&SessionId::new("s3"));
        assert_eq!(store.len(), 5);
        assert!(store.get(&SessionId::new("s3")).is_none());
    }

    #[test]
    fn test_update_merges_only_given_fields() {
        let mut store = store();
        let id = SessionId::new("s1");
        let before = store.get(&id).unwrap().clone();

        assert!(store.update(&id, SessionPatch::flagged(true)));
        let after = store.get(&id).unwrap();
        assert!(after.flagged);
        assert_eq!(after.notes, before.notes);
        assert_eq!(after.start_time, before.start_time);

        assert!(!store.update(&SessionId::new("missing"), SessionPatch::flagged(true)));
    }

    #[test]
    fn test_handle_shares_state() {
        let handle = SessionStoreHandle::new(store());
        let other = handle.clone();
        other.remove(&SessionId::new("s1"));
        assert_eq!(handle.len(), 5);
    }

    #[test]
    fn test_snapshot_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.json");

        assert_eq!(SessionStore::load(&path).unwrap(), None);

        let original = store();
        original.save(&path).unwrap();
        let loaded = SessionStore::load(&path).unwrap().unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_snapshot_corrupt_or_wrong_version_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.json");

        fs::write(&path, "{not json").unwrap();
        assert_eq!(SessionStore::load(&path).unwrap(), None);

        fs::write(&path, r#"{"version": 99, "sessions": []}"#).unwrap();
        assert_eq!(SessionStore::load(&path).unwrap(), None);

        fs::write(&path, "   ").unwrap();
        assert_eq!(SessionStore::load(&path).unwrap(), None);
    }
}
