//! Worker flow for SARMS (Layer 2)
//!
//! The guided sequence a worker follows to start and end a unit of work:
//! department, task, zone and line selection, then start, restore on the
//! next login, and end.

#![warn(missing_docs)]

pub mod context;
pub mod error;
pub mod lines;
pub mod flow;

pub use context::{FlowConfig, FlowContext};
pub use error::FlowError;
pub use lines::{validate_lines, LineRange};
pub use flow::{ActiveSession, FlowStep, Selection, WorkerFlow};
