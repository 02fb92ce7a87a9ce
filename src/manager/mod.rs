//! Control Loop Manager module
//!
//! Orchestrates the polling loop lifecycle - start, stop, status.

mod loop_manager;

pub use loop_manager::{ControlLoopManager, StartOutcome, StartPolicy};
pub(crate) use loop_manager::current_runtime;
