//! Point-in-time diagnostics snapshot.

use serde::{Deserialize, Serialize};

use super::LoopStatus;
use crate::cycle::CycleReport;

/// What the controller is doing right now
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Derived lifecycle status
    pub status: LoopStatus,
    /// Background tasks still alive under the active cancellation token
    pub running_tasks: usize,
    /// Poll cycles completed since the manager was created
    pub cycles_completed: u64,
    /// Loop tasks ended by a failing poll cycle
    pub failed_loops: u64,
    /// Most recent completed cycle, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_report: Option<CycleReport>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_without_report() {
        let diagnostics = Diagnostics {
            status: LoopStatus::Stopped,
            running_tasks: 0,
            cycles_completed: 0,
            failed_loops: 0,
            last_report: None,
        };
        let json = serde_json::to_value(&diagnostics).unwrap();
        assert_eq!(json["status"], "stopped");
        assert!(json.get("last_report").is_none());
    }
}
