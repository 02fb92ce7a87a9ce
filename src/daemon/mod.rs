//! Daemon session - drives a controller from a line-oriented command stream
//!
//! Each input line is a JSON object mapping command names to arguments, the
//! same shape `do_command` accepts. Each response is written back as a single
//! JSON line.

pub mod session;

pub use session::{SessionSummary, run_session};
