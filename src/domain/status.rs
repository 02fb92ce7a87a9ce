//! Lifecycle status of a control loop manager.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Externally observable state; derived, never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopStatus {
    Running,
    Stopped,
}

impl fmt::Display for LoopStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopStatus::Running => write!(f, "running"),
            LoopStatus::Stopped => write!(f, "stopped"),
        }
    }
}
