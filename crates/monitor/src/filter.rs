//! Session filtering.

use sarms_core::{Session, SessionStatus};

use crate::view::SessionView;

/// Conjunctive filter criteria. `None` or blank fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionFilter {
    /// Keep only sessions with this derived status
    pub status: Option<SessionStatus>,

    /// Department id
    pub department: Option<String>,

    /// Task type id
    pub task_type: Option<String>,

    /// Zone id
    pub zone: Option<String>,

    /// Case-insensitive substring of the worker name or id
    pub worker_query: Option<String>,
}

impl SessionFilter {
    /// Whether `view` satisfies every criterion.
    pub fn matches(&self, view: &SessionView) -> bool {
        let s = &view.session;

        if self.status.is_some_and(|status| view.status != status) {
            return false;
        }
        if let Some(dept) = given(&self.department) {
            if department_key(s) != dept {
                return false;
            }
        }
        if let Some(task_type) = given(&self.task_type) {
            if task_type_key(s) != task_type {
                return false;
            }
        }
        if let Some(zone) = given(&self.zone) {
            if zone_key(s) != zone {
                return false;
            }
        }
        if let Some(query) = given(&self.worker_query) {
            let query = query.to_lowercase();
            let hit = s.worker_name.to_lowercase().contains(&query)
                || s.worker_id.to_lowercase().contains(&query);
            if !hit {
                return false;
            }
        }
        true
    }
}

/// Sessions matching `filter`, in their original order.
pub fn filter_sessions(sessions: &[SessionView], filter: &SessionFilter) -> Vec<SessionView> {
    sessions.iter().filter(|v| filter.matches(v)).cloned().collect()
}

fn given(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

// Older sessions may lack ids; fall back to the lowercased label.
fn department_key(s: &Session) -> String {
    if s.department_id.is_empty() {
        s.department.to_lowercase()
    } else {
        s.department_id.clone()
    }
}

fn task_type_key(s: &Session) -> &str {
    if s.task_type_id.is_empty() {
        &s.department_id
    } else {
        &s.task_type_id
    }
}

fn zone_key(s: &Session) -> String {
    if s.zone_id.is_empty() {
        s.zone.to_lowercase()
    } else {
        s.zone_id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sarms_core::seed_sessions;

    fn views() -> Vec<SessionView> {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        seed_sessions(now)
            .into_iter()
            .map(|s| SessionView::at(s, now))
            .collect()
    }

    fn ids(list: &[SessionView]) -> Vec<&str> {
        list.iter().map(|v| v.session.id.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_keeps_all() {
        let all = views();
        assert_eq!(filter_sessions(&all, &SessionFilter::default()), all);
    }

    #[test]
    fn test_status_filter() {
        let all = views();
        let filter = SessionFilter {
            status: Some(SessionStatus::Flagged),
            ..Default::default()
        };
        assert_eq!(ids(&filter_sessions(&all, &filter)), vec!["s2", "s6"]);
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let all = views();
        let filter = SessionFilter {
            department: Some("maintenance".into()),
            zone: Some("b".into()),
            status: Some(SessionStatus::Flagged),
            ..Default::default()
        };
        assert_eq!(ids(&filter_sessions(&all, &filter)), vec!["s2", "s6"]);

        let filter = SessionFilter {
            department: Some("farming".into()),
            zone: Some("c".into()),
            ..Default::default()
        };
        assert!(filter_sessions(&all, &filter).is_empty());
    }

    #[test]
    fn test_worker_query_is_case_insensitive() {
        let all = views();
        let by_name = SessionFilter {
            worker_query: Some("  fATima ".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_sessions(&all, &by_name)), vec!["s4"]);

        let by_id = SessionFilter {
            worker_query: Some("1".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_sessions(&all, &by_id)), vec!["s1", "s2"]);
    }

    #[test]
    fn test_fallback_to_labels() {
        let mut all = views();
        all[0].session.department_id.clear();
        all[0].session.task_type_id.clear();
        all[0].session.zone_id.clear();

        let filter = SessionFilter {
            department: Some("farming".into()),
            zone: Some("a".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_sessions(&all, &filter)), vec!["s1", "s3"]);

        let filter = SessionFilter {
            task_type: Some("farming".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_sessions(&all, &filter)), vec!["s3"]);
    }
}
