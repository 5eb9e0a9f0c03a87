//! Identity resolution for login identifiers.
//!
//! The roster is a mock lookup, not a security boundary: the core trusts the
//! identifier handed to it by the login or QR collaborator.

use serde::{Deserialize, Serialize};

use crate::id::normalize_worker_key;

/// Role attached to a login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Field worker
    Worker,
    /// Technician
    Technician,
    /// Supervising engineer
    Engineer,
    /// Administrator
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Worker => "worker",
            Self::Technician => "technician",
            Self::Engineer => "engineer",
            Self::Admin => "admin",
        };
        write!(f, "{}", s)
    }
}

/// A registered person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    /// Internal worker id (used on sessions)
    pub id: String,

    /// Login identifier, lowercase (e.g. `w1`)
    pub employee_id: String,

    /// Display name
    pub full_name: String,

    /// Role
    pub role: Role,
}

/// Who a session belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerIdentity {
    /// Identifier typed or scanned at login, as given
    pub login_id: String,

    /// Worker id written on sessions
    pub worker_id: String,

    /// Display name written on sessions
    pub worker_name: String,
}

impl WorkerIdentity {
    /// Normalized login id used to key durable drafts.
    pub fn key(&self) -> String {
        normalize_worker_key(&self.login_id)
    }
}

/// The set of known people.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    /// All entries
    pub entries: Vec<RosterEntry>,
}

impl Roster {
    /// Find an entry by login identifier (case-insensitive, trimmed).
    pub fn find(&self, login_id: &str) -> Option<&RosterEntry> {
        let key = normalize_worker_key(login_id);
        self.entries.iter().find(|e| e.employee_id == key)
    }

    /// Resolve a raw login id, falling back to the raw id for both the
    /// worker id and the display name when it is not registered.
    pub fn resolve(&self, login_id: &str) -> WorkerIdentity {
        match self.find(login_id) {
            Some(entry) => WorkerIdentity {
                login_id: login_id.to_string(),
                worker_id: entry.id.clone(),
                worker_name: entry.full_name.clone(),
            },
            None => WorkerIdentity {
                login_id: login_id.to_string(),
                worker_id: login_id.to_string(),
                worker_name: login_id.to_string(),
            },
        }
    }

    /// Role for a login id, if registered.
    pub fn role_of(&self, login_id: &str) -> Option<Role> {
        self.find(login_id).map(|e| e.role)
    }
}

impl Default for Roster {
    fn default() -> Self {
        let entry = |id: &str, employee_id: &str, full_name: &str, role: Role| RosterEntry {
            id: id.to_string(),
            employee_id: employee_id.to_string(),
            full_name: full_name.to_string(),
            role,
        };

        Self {
            entries: vec![
                entry("1", "w1", "Worker One", Role::Worker),
                entry("2", "e1", "Engineer One", Role::Engineer),
                entry("3", "a1", "Admin One", Role::Admin),
                entry("4", "w2", "Ahmed Hassan", Role::Worker),
                entry("5", "w3", "Fatima Ali", Role::Worker),
                entry("6", "w4", "Omar Khalid", Role::Worker),
                entry("7", "w5", "Sara Mohammed", Role::Worker),
                entry("8", "e2", "Engineer Two", Role::Engineer),
                entry("9", "a2", "Admin Two", Role::Admin),
            ],
        }
    }
}
