//! Storage for SARMS.
//!
//! This crate provides the in-memory session store shared by the worker
//! flow and the supervisor monitor, plus a key-value abstraction used to
//! persist worker drafts across logins.

#![warn(missing_docs)]

pub mod trait_;
pub mod json_storage;
pub mod session_store;
pub mod draft;

pub use trait_::{KeyValueStore, StorageError, Result};
pub use json_storage::{FileStore, MemoryStore};
pub use session_store::{SessionPatch, SessionStore, SessionStoreHandle};
pub use draft::{
    clear_draft, draft_key, load_draft, save_draft, DraftError, ResolvedDraft,
    WorkerDraft, DRAFT_KEY_PREFIX,
};
