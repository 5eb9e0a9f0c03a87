//! Session model - one worker's in-progress unit of task execution.

use serde::{Deserialize, Serialize};

use crate::id::SessionId;
use crate::Time;

/// An active-work session.
///
/// Status is deliberately absent: it is derived on demand by
/// [`crate::status::derive_status`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Unique identifier, stable for the session lifetime
    pub id: SessionId,

    /// Worker performing the task
    pub worker_id: String,

    /// Worker display name (denormalized)
    pub worker_name: String,

    /// Department label, in the language active at creation
    pub department: String,

    /// Department catalog id
    pub department_id: String,

    /// Task type id (the department id for worker-started sessions)
    pub task_type_id: String,

    /// Task label, in the language active at creation
    pub task: String,

    /// Zone label, in the language active at creation
    pub zone: String,

    /// Zone catalog id
    pub zone_id: String,

    /// Line range, e.g. `1–20`
    pub lines_area: String,

    /// Creation instant; never mutated
    pub start_time: Time,

    /// Planned duration, used as the delay threshold
    pub expected_minutes: u32,

    /// Supervisor flag; overrides the derived status
    #[serde(default)]
    pub flagged: bool,

    /// Supervisor notes, append-only
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl Session {
    /// Format a line range the way it is displayed on sessions.
    pub fn lines_area(from: &str, to: &str) -> String {
        format!("{}–{}", from.trim(), to.trim())
    }
}

/// A timestamped supervisor note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// When it was written
    pub at: Time,

    /// Note text (already trimmed)
    pub text: String,
}

/// Immutable record of a just-completed session.
///
/// Produced once at end-of-task and handed to the records collaborator;
/// the core does not retain it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedSession {
    /// Id of the session that was closed
    pub session_id: SessionId,

    /// Worker id
    pub worker_id: String,

    /// Worker display name
    pub worker_name: String,

    /// Department catalog id
    pub department_id: String,

    /// Department label baked in at start
    pub department: String,

    /// Task catalog id
    pub task_id: String,

    /// Task label baked in at start
    pub task: String,

    /// Zone catalog id
    pub zone_id: String,

    /// Zone label baked in at start
    pub zone: String,

    /// First line
    pub line_from: String,

    /// Last line
    pub line_to: String,

    /// When the task was started
    pub start_time: Time,

    /// When the task was ended
    pub end_time: Time,

    /// Whole minutes between start and end, rounded
    pub duration: i64,
}

/// Rounded minutes between two instants (half a minute rounds up).
///
/// Completion durations are a rounded summary, unlike the floored live
/// elapsed time.
pub fn rounded_minutes(start: Time, end: Time) -> i64 {
    let ms = (end - start).num_milliseconds();
    (ms + 30_000).div_euclid(60_000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn test_rounded_minutes() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        assert_eq!(rounded_minutes(start, start), 0);
        assert_eq!(rounded_minutes(start, start + Duration::seconds(29)), 0);
        assert_eq!(rounded_minutes(start, start + Duration::seconds(30)), 1);
        assert_eq!(rounded_minutes(start, start + Duration::seconds(89)), 1);
        assert_eq!(rounded_minutes(start, start + Duration::seconds(90)), 2);
    }

    #[test]
    fn test_lines_area() {
        assert_eq!(Session::lines_area(" 3", "12 "), "3–12");
    }

    #[test]
    fn test_session_serializes_camel_case() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let session = Session {
            id: SessionId::new("s1"),
            worker_id: "1".into(),
            worker_name: "Worker One".into(),
            department: "Farming".into(),
            department_id: "farming".into(),
            task_type_id: "farming".into(),
            task: "Harvest".into(),
            zone: "A".into(),
            zone_id: "a".into(),
            lines_area: "1–20".into(),
            start_time: start,
            expected_minutes: 120,
            flagged: false,
            notes: vec![],
        };

        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["workerId"], "1");
        assert_eq!(json["expectedMinutes"], 120);
        assert!(json.get("status").is_none());
    }
}
