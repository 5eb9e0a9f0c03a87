//! Persisted worker drafts.
//!
//! A draft lets a worker resume an in-progress session after logging out
//! and back in on the same device. It is written when the task starts,
//! consumed on the next login, and deleted when the task ends.
//!
//! Loading reports *why* no usable draft exists ([`DraftError`]); the worker
//! flow collapses every variant to "start fresh".

use sarms_core::{normalize_worker_key, Catalog, CatalogEntry, Department, SessionId, Time};
use serde::{Deserialize, Serialize};

use super::{KeyValueStore, StorageError};

/// Prefix shared by every draft key.
pub const DRAFT_KEY_PREFIX: &str = "sarms-worker-session-";

/// Storage key for a worker's draft.
pub fn draft_key(worker_login: &str) -> String {
    format!("{}{}", DRAFT_KEY_PREFIX, normalize_worker_key(worker_login))
}

/// Serialized draft record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerDraft {
    /// Session created when the task started
    pub session_id: SessionId,

    /// Department catalog id
    pub department_id: String,

    /// Task catalog id
    pub task_id: String,

    /// Zone catalog id
    pub zone_id: String,

    /// First line, as entered
    #[serde(default)]
    pub line_from: String,

    /// Last line, as entered
    #[serde(default)]
    pub line_to: String,

    /// Session start instant
    pub start_time: Time,

    /// Department label baked in at start
    #[serde(default)]
    pub department_label: Option<String>,

    /// Task label baked in at start
    #[serde(default)]
    pub task_label: Option<String>,

    /// Zone label baked in at start
    #[serde(default)]
    pub zone_label: Option<String>,
}

/// Why no usable draft could be loaded.
#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    /// Nothing stored for this worker
    #[error("no draft stored")]
    Absent,

    /// The backend failed to read
    #[error("draft unreadable: {0}")]
    Unreadable(#[source] StorageError),

    /// Stored value does not parse or misses required ids
    #[error("draft malformed: {0}")]
    Malformed(String),

    /// A referenced catalog entry no longer exists
    #[error("draft references unknown {kind} `{id}`")]
    StaleReference {
        /// Which catalog: department, task or zone
        kind: &'static str,
        /// The id that failed to resolve
        id: String,
    },
}

/// A draft whose catalog references all resolved.
#[derive(Debug, Clone)]
pub struct ResolvedDraft<'c> {
    /// The stored record
    pub draft: WorkerDraft,

    /// Resolved department
    pub department: &'c Department,

    /// Resolved task
    pub task: &'c CatalogEntry,

    /// Resolved zone
    pub zone: &'c CatalogEntry,
}

/// Load and resolve the draft for `worker_login`.
pub fn load_draft<'c, S: KeyValueStore + ?Sized>(
    store: &S,
    worker_login: &str,
    catalog: &'c Catalog,
) -> Result<ResolvedDraft<'c>, DraftError> {
    let raw = store
        .get(&draft_key(worker_login))
        .map_err(DraftError::Unreadable)?
        .ok_or(DraftError::Absent)?;

    let draft: WorkerDraft =
        serde_json::from_str(&raw).map_err(|e| DraftError::Malformed(e.to_string()))?;

    if draft.session_id.as_str().is_empty()
        || draft.department_id.is_empty()
        || draft.zone_id.is_empty()
    {
        return Err(DraftError::Malformed("missing session, department or zone id".to_string()));
    }

    let department = catalog
        .department(&draft.department_id)
        .ok_or_else(|| DraftError::StaleReference {
            kind: "department",
            id: draft.department_id.clone(),
        })?;
    let zone = catalog.zone(&draft.zone_id).ok_or_else(|| DraftError::StaleReference {
        kind: "zone",
        id: draft.zone_id.clone(),
    })?;
    let task = catalog
        .task(&draft.department_id, &draft.task_id)
        .ok_or_else(|| DraftError::StaleReference {
            kind: "task",
            id: draft.task_id.clone(),
        })?;

    Ok(ResolvedDraft {
        draft,
        department,
        task,
        zone,
    })
}

/// Write the draft for `worker_login`.
pub fn save_draft<S: KeyValueStore + ?Sized>(
    store: &mut S,
    worker_login: &str,
    draft: &WorkerDraft,
) -> super::Result<()> {
    let json = serde_json::to_string(draft)?;
    store.set(&draft_key(worker_login), &json)
}

/// Delete the draft for `worker_login`.
pub fn clear_draft<S: KeyValueStore + ?Sized>(store: &mut S, worker_login: &str) -> super::Result<()> {
    store.remove(&draft_key(worker_login))
}
