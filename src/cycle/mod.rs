//! Poll cycle module - one read/decide/write/observe iteration.
//!
//! This module provides:
//! - PollCycle for executing a single iteration against the current config
//! - CycleReport describing what the iteration saw and did

mod poll_cycle;

pub use poll_cycle::{CycleReport, DEFAULT_SETTLE, PollCycle};
