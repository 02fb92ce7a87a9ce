//! Domain types shared across the controller
//!
//! - LoopStatus: externally observable lifecycle state (Running, Stopped)
//! - LoopOutcome: how a background control loop task ended
//! - Command: recognized `do_command` names
//! - Diagnostics: point-in-time view of a controller

pub mod command;
pub mod diagnostics;
pub mod outcome;
pub mod status;

pub use command::Command;
pub use diagnostics::Diagnostics;
pub use outcome::LoopOutcome;
pub use status::LoopStatus;
