//! Plain-text rendering for terminal output.

use std::fmt::Write;

use sarms_core::{format_duration, CompletedSession, Time};
use sarms_monitor::{SessionView, Summary};
use sarms_work::{FlowStep, WorkerFlow};

/// Header counters followed by one row per session.
pub fn monitor_table(timestamp: Time, sessions: &[SessionView], summary: &Summary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Active work at {}", timestamp.format("%Y-%m-%d %H:%M:%S UTC"));
    let _ = writeln!(
        out,
        "  workers: {}  tasks: {}  delayed: {}  flagged: {}",
        summary.active_workers, summary.active_tasks, summary.delayed_tasks, summary.flagged_issues
    );
    let _ = writeln!(out);

    if sessions.is_empty() {
        let _ = writeln!(out, "No active sessions match the filters.");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<28} {:<16} {:<12} {:<24} {:<10} {:<8} {:>8} {:>8}  {}",
        "ID", "WORKER", "DEPARTMENT", "TASK", "ZONE", "LINES", "ELAPSED", "EXPECTED", "STATUS"
    );
    for v in sessions {
        let s = &v.session;
        let _ = writeln!(
            out,
            "{:<28} {:<16} {:<12} {:<24} {:<10} {:<8} {:>8} {:>8}  {}",
            s.id,
            s.worker_name,
            s.department,
            s.task,
            s.zone,
            s.lines_area,
            format_duration(v.elapsed_minutes),
            format_duration(i64::from(s.expected_minutes)),
            v.status.label()
        );
    }
    out
}

/// Full detail for one session, notes included.
pub fn session_detail(view: &SessionView) -> String {
    let s = &view.session;
    let mut out = String::new();
    let _ = writeln!(out, "Session: {}", s.id);
    let _ = writeln!(out, "  Worker: {} ({})", s.worker_name, s.worker_id);
    let _ = writeln!(out, "  Department: {}", s.department);
    let _ = writeln!(out, "  Task: {}", s.task);
    let _ = writeln!(out, "  Zone: {}", s.zone);
    let _ = writeln!(out, "  Lines: {}", s.lines_area);
    let _ = writeln!(out, "  Started: {}", s.start_time.format("%Y-%m-%d %H:%M UTC"));
    let _ = writeln!(
        out,
        "  Elapsed: {} of {}",
        format_duration(view.elapsed_minutes),
        format_duration(i64::from(s.expected_minutes))
    );
    let _ = writeln!(out, "  Status: {}", view.status.label());
    if s.notes.is_empty() {
        let _ = writeln!(out, "  Notes: none");
    } else {
        let _ = writeln!(out, "  Notes:");
        for note in &s.notes {
            let _ = writeln!(out, "    [{}] {}", note.at.format("%H:%M"), note.text);
        }
    }
    out
}

/// Where a worker stands, as seen on their screen.
pub fn flow_status(flow: &WorkerFlow<'_>, now: Time) -> String {
    let worker = flow.worker();
    let mut out = String::new();
    let _ = writeln!(out, "Worker: {} ({})", worker.worker_name, worker.worker_id);

    match flow.active() {
        Some(active) if flow.step() == FlowStep::Executing => {
            let minutes = (now - active.start_time).num_minutes();
            let _ = writeln!(out, "  In progress: {} / {}", active.department, active.task);
            let _ = writeln!(out, "  Zone: {}  Lines: {}–{}", active.zone, active.line_from, active.line_to);
            let _ = writeln!(out, "  Running for {}", format_duration(minutes));
        }
        _ => {
            let _ = writeln!(out, "  Not started ({})", flow.step());
        }
    }
    out
}

/// Completion summary shown on the confirmation screen.
pub fn completion(snapshot: &CompletedSession) -> String {
    format!(
        "Task ended: {} / {} in zone {}, lines {}–{}, {}\n",
        snapshot.department,
        snapshot.task,
        snapshot.zone,
        snapshot.line_from,
        snapshot.line_to,
        format_duration(snapshot.duration)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sarms_core::seed_sessions;
    use sarms_monitor::summarize;

    fn views(now: Time) -> Vec<SessionView> {
        seed_sessions(now)
            .into_iter()
            .map(|s| SessionView::at(s, now))
            .collect()
    }

    #[test]
    fn test_monitor_table() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let list = views(now);
        let out = monitor_table(now, &list, &summarize(&list));

        assert!(out.contains("workers: 5  tasks: 6  delayed: 1  flagged: 2"));
        assert!(out.contains("Omar Khalid"));
        assert!(out.contains("Delayed"));
        assert!(out.contains("1h 30m"));
    }

    #[test]
    fn test_empty_table() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let out = monitor_table(now, &[], &Summary::default());
        assert!(out.contains("No active sessions match the filters."));
    }

    #[test]
    fn test_session_detail_lists_notes() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let list = views(now);
        let s2 = list.iter().find(|v| v.session.id.as_str() == "s2").unwrap();

        let out = session_detail(s2);
        assert!(out.contains("Status: Flagged"));
        assert!(out.contains("Waiting for equipment"));
    }
}
