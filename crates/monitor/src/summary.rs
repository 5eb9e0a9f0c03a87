//! Summary counts for the monitoring header.

use std::collections::HashSet;

use sarms_core::SessionStatus;
use serde::Serialize;

use crate::view::SessionView;

/// Header counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Distinct worker ids over all given sessions, whatever their status
    pub active_workers: usize,

    /// Number of sessions
    pub active_tasks: usize,

    /// Sessions whose derived status is delayed
    pub delayed_tasks: usize,

    /// Sessions whose derived status is flagged
    pub flagged_issues: usize,
}

/// Count `sessions`.
pub fn summarize(sessions: &[SessionView]) -> Summary {
    let workers: HashSet<&str> = sessions.iter().map(|v| v.session.worker_id.as_str()).collect();
    let count = |status: SessionStatus| sessions.iter().filter(|v| v.status == status).count();

    Summary {
        active_workers: workers.len(),
        active_tasks: sessions.len(),
        delayed_tasks: count(SessionStatus::Delayed),
        flagged_issues: count(SessionStatus::Flagged),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sarms_core::seed_sessions;

    #[test]
    fn test_summary_of_seed() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let views: Vec<_> = seed_sessions(now)
            .into_iter()
            .map(|s| SessionView::at(s, now))
            .collect();

        let summary = summarize(&views);
        assert_eq!(
            summary,
            Summary {
                active_workers: 5,
                active_tasks: 6,
                delayed_tasks: 1,
                flagged_issues: 2,
            }
        );
    }

    #[test]
    fn test_flagged_worker_still_counts_as_active() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let views: Vec<_> = seed_sessions(now)
            .into_iter()
            .filter(|s| s.flagged)
            .map(|s| SessionView::at(s, now))
            .collect();

        let summary = summarize(&views);
        assert_eq!(summary.active_workers, 2);
        assert_eq!(summary.flagged_issues, 2);
    }

    #[test]
    fn test_empty() {
        assert_eq!(summarize(&[]), Summary::default());
    }
}
