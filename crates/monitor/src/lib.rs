//! Active-work monitoring (Layer 3)
//!
//! Live status, summary counts, filtering, and supervisor flag/note
//! actions over the shared session store.

#![warn(missing_docs)]

pub mod config;
pub mod view;
pub mod summary;
pub mod filter;

pub use config::MonitorConfig;
pub use view::{MonitorSnapshot, MonitorView, SessionView};
pub use summary::{summarize, Summary};
pub use filter::{filter_sessions, SessionFilter};
