//! Supervisor view over the session store.

use sarms_core::{derive_status, elapsed_minutes, Clock, Note, Session, SessionId, SessionStatus, Time};
use sarms_storage::{SessionPatch, SessionStoreHandle};
use serde::Serialize;
use tracing::debug;

use crate::summary::{summarize, Summary};

/// A session paired with its status at a given instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    /// The stored session
    #[serde(flatten)]
    pub session: Session,

    /// Status derived for the instant of the query
    pub status: SessionStatus,

    /// Whole minutes since start (floored)
    pub elapsed_minutes: i64,
}

impl SessionView {
    /// Derive the view of `session` at `now`.
    pub fn at(session: Session, now: Time) -> Self {
        let status = derive_status(&session, now);
        let elapsed_minutes = elapsed_minutes(&session, now);
        Self {
            session,
            status,
            elapsed_minutes,
        }
    }
}

/// Everything the monitoring screen shows for one tick.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorSnapshot {
    /// When the snapshot was taken
    pub timestamp: Time,

    /// Every session with live status
    pub sessions: Vec<SessionView>,

    /// Counts over `sessions`
    pub summary: Summary,
}

/// Read model and supervisor actions for active work.
///
/// Nothing is cached: every read recomputes status from the store and the
/// instant it is given.
pub struct MonitorView<C: Clock> {
    store: SessionStoreHandle,
    clock: C,
}

impl<C: Clock> MonitorView<C> {
    /// Create a view over a shared store.
    pub fn new(store: SessionStoreHandle, clock: C) -> Self {
        Self { store, clock }
    }

    /// The clock used for snapshots and note timestamps.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Every stored session with status and elapsed time at `now`,
    /// most-recent-first.
    pub fn list_with_status(&self, now: Time) -> Vec<SessionView> {
        self.store
            .list()
            .into_iter()
            .map(|s| SessionView::at(s, now))
            .collect()
    }

    /// One session with status at `now`.
    pub fn session(&self, id: &SessionId, now: Time) -> Option<SessionView> {
        self.store.get(id).map(|s| SessionView::at(s, now))
    }

    /// List and summarize at the clock's current instant.
    pub fn snapshot(&self) -> MonitorSnapshot {
        let timestamp = self.clock.now();
        let sessions = self.list_with_status(timestamp);
        let summary = summarize(&sessions);
        MonitorSnapshot {
            timestamp,
            sessions,
            summary,
        }
    }

    /// Invert the flag on a session.
    ///
    /// Returns the new flag value, or `None` if the session is gone.
    pub fn toggle_flag(&self, id: &SessionId) -> Option<bool> {
        let flagged = !self.store.get(id)?.flagged;
        self.store.update(id, SessionPatch::flagged(flagged));
        debug!(session = %id, flagged, "flag toggled");
        Some(flagged)
    }

    /// Append a timestamped note.
    ///
    /// Blank text and unknown sessions are ignored; returns whether a note
    /// was added.
    pub fn add_note(&self, id: &SessionId, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        let Some(session) = self.store.get(id) else {
            return false;
        };

        let mut notes = session.notes;
        notes.push(Note {
            at: self.clock.now(),
            text: text.to_string(),
        });
        let added = self.store.update(id, SessionPatch::notes(notes));
        debug!(session = %id, added, "note added");
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use sarms_core::{seed_sessions, ManualClock};
    use sarms_storage::SessionStore;

    fn start() -> Time {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn view(clock: &ManualClock) -> MonitorView<&ManualClock> {
        let store = SessionStore::with_sessions(seed_sessions(clock.now()));
        MonitorView::new(SessionStoreHandle::new(store), clock)
    }

    #[test]
    fn test_list_recomputes_status() {
        let clock = ManualClock::new(start());
        let monitor = view(&clock);

        let now = clock.now();
        let list = monitor.list_with_status(now);
        assert_eq!(list.len(), 6);
        let s1 = list.iter().find(|v| v.session.id.as_str() == "s1").unwrap();
        assert_eq!(s1.status, SessionStatus::Active);
        assert_eq!(s1.elapsed_minutes, 45);

        let later = monitor.list_with_status(now + Duration::minutes(76));
        let s1 = later.iter().find(|v| v.session.id.as_str() == "s1").unwrap();
        assert_eq!(s1.status, SessionStatus::Delayed);
        assert_eq!(s1.elapsed_minutes, 121);
    }

    #[test]
    fn test_toggle_flag_overrides_status() {
        let clock = ManualClock::new(start());
        let monitor = view(&clock);
        let id = SessionId::new("s5");
        let now = clock.now();

        assert_eq!(monitor.session(&id, now).unwrap().status, SessionStatus::Delayed);
        assert_eq!(monitor.toggle_flag(&id), Some(true));
        assert_eq!(monitor.session(&id, now).unwrap().status, SessionStatus::Flagged);
        assert_eq!(monitor.toggle_flag(&id), Some(false));
        assert_eq!(monitor.session(&id, now).unwrap().status, SessionStatus::Delayed);

        assert_eq!(monitor.toggle_flag(&SessionId::new("missing")), None);
    }

    #[test]
    fn test_add_note_appends() {
        let clock = ManualClock::new(start());
        let monitor = view(&clock);
        let id = SessionId::new("s2");
        let before = monitor.session(&id, clock.now()).unwrap().session.notes;

        clock.advance_minutes(3);
        assert!(monitor.add_note(&id, "  Equipment arrived  "));
        let notes = monitor.session(&id, clock.now()).unwrap().session.notes;
        assert_eq!(notes.len(), before.len() + 1);
        assert_eq!(notes[..before.len()], before[..]);
        let last = notes.last().unwrap();
        assert_eq!(last.text, "Equipment arrived");
        assert_eq!(last.at, clock.now());
    }

    #[test]
    fn test_blank_note_is_ignored() {
        let clock = ManualClock::new(start());
        let monitor = view(&clock);
        let id = SessionId::new("s1");

        assert!(!monitor.add_note(&id, "   "));
        assert!(monitor.session(&id, clock.now()).unwrap().session.notes.is_empty());
        assert!(!monitor.add_note(&SessionId::new("missing"), "hello"));
    }

    #[test]
    fn test_snapshot_summary() {
        let clock = ManualClock::new(start());
        let monitor = view(&clock);

        let snapshot = monitor.snapshot();
        assert_eq!(snapshot.timestamp, start());
        assert_eq!(snapshot.summary.active_tasks, 6);
        assert_eq!(snapshot.summary.flagged_issues, 2);
        assert_eq!(snapshot.summary.delayed_tasks, 1);
    }
}
