//! Worker flow configuration and collaborators.

use sarms_core::{Catalog, Clock, Language};
use sarms_storage::{KeyValueStore, SessionStoreHandle};
use serde::{Deserialize, Serialize};

/// Tunables for the worker flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Lowest accepted line number
    pub line_min: i64,
    /// Highest accepted line number
    pub line_max: i64,
    /// Planned duration given to worker-started sessions
    pub expected_minutes: u32,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            line_min: 1,
            line_max: 20,
            expected_minutes: 60,
        }
    }
}

/// Everything a worker flow reads from or writes to.
pub struct FlowContext<'a> {
    /// Reference catalog
    pub catalog: &'a Catalog,

    /// The shared session store
    pub sessions: SessionStoreHandle,

    /// Device-local durable storage for drafts
    pub drafts: &'a mut dyn KeyValueStore,

    /// Source of "now"
    pub clock: &'a dyn Clock,

    /// Display language at flow start
    pub language: Language,

    /// Tunables
    pub config: FlowConfig,
}
