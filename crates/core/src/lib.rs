//! SARMS core data models.
//!
//! This crate defines the session model, the static catalog, identity
//! resolution, and the pure status derivation engine that the worker flow
//! and the supervisor monitor are built on.

#![warn(missing_docs)]

// Identities and time
mod id;
pub mod clock;

// Reference data
mod catalog;
mod identity;

// Sessions
mod session;
pub mod status;
mod seed;

// Re-exports
pub use id::{normalize_worker_key, SessionId};
pub use clock::{Clock, ManualClock, SystemClock};

pub use catalog::{Catalog, CatalogEntry, Department, Language, UnknownLanguage};
pub use identity::{Role, Roster, RosterEntry, WorkerIdentity};

pub use session::{rounded_minutes, CompletedSession, Note, Session};
pub use status::{derive_status, elapsed_minutes, format_duration, SessionStatus, UnknownStatus};
pub use seed::seed_sessions;

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
