//! Demonstration sessions seeded into a fresh store.

use chrono::Duration;

use crate::id::SessionId;
use crate::session::{Note, Session};
use crate::Time;

/// The six demo sessions, with start times relative to `now`.
///
/// Mix: two flagged, one past its expected duration, the rest on time.
pub fn seed_sessions(now: Time) -> Vec<Session> {
    let ago = |minutes: i64| now - Duration::minutes(minutes);
    let note = |at: Time, text: &str| Note {
        at,
        text: text.to_string(),
    };

    #[allow(clippy::too_many_arguments)]
    fn session(
        id: &str,
        worker: (&str, &str),
        department: (&str, &str),
        task: &str,
        zone: (&str, &str),
        lines_area: &str,
        start_time: Time,
        expected_minutes: u32,
        flagged: bool,
        notes: Vec<Note>,
    ) -> Session {
        Session {
            id: SessionId::new(id),
            worker_id: worker.0.to_string(),
            worker_name: worker.1.to_string(),
            department: department.1.to_string(),
            department_id: department.0.to_string(),
            task_type_id: department.0.to_string(),
            task: task.to_string(),
            zone: zone.1.to_string(),
            zone_id: zone.0.to_string(),
            lines_area: lines_area.to_string(),
            start_time,
            expected_minutes,
            flagged,
            notes,
        }
    }

    vec![
        session(
            "s1",
            ("1", "Worker One"),
            ("farming", "Farming"),
            "Harvest",
            ("a", "A"),
            "1–20",
            ago(45),
            120,
            false,
            vec![],
        ),
        session(
            "s2",
            ("1", "Worker One"),
            ("maintenance", "Maintenance"),
            "Internal Transport",
            ("b", "B"),
            "5–15",
            ago(90),
            60,
            true,
            vec![note(now, "Waiting for equipment")],
        ),
        session(
            "s3",
            ("4", "Ahmed Hassan"),
            ("farming", "Farming"),
            "Harvest Zone A",
            ("a", "A"),
            "10–25",
            ago(30),
            90,
            false,
            vec![],
        ),
        session(
            "s4",
            ("5", "Fatima Ali"),
            ("quality", "Quality"),
            "Quality check Zone C",
            ("c", "C"),
            "1–15",
            ago(20),
            45,
            false,
            vec![],
        ),
        session(
            "s5",
            ("6", "Omar Khalid"),
            ("storage", "Storage"),
            "Stock count",
            ("inventory", "Inventory"),
            "—",
            ago(120),
            60,
            false,
            vec![note(ago(60), "Started count")],
        ),
        session(
            "s6",
            ("7", "Sara Mohammed"),
            ("maintenance", "Maintenance"),
            "Conveyor B2 repair",
            ("b", "B"),
            "—",
            ago(75),
            90,
            true,
            vec![note(now, "Waiting for spare parts")],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{derive_status, SessionStatus};
    use chrono::Utc;

    #[test]
    fn test_seed_status_mix() {
        let now = Utc::now();
        let sessions = seed_sessions(now);
        assert_eq!(sessions.len(), 6);

        let count = |status| {
            sessions
                .iter()
                .filter(|s| derive_status(s, now) == status)
                .count()
        };
        assert_eq!(count(SessionStatus::Flagged), 2);
        assert_eq!(count(SessionStatus::Delayed), 1);
        assert_eq!(count(SessionStatus::Active), 3);
    }
}
