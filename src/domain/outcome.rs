//! Control loop outcome types.
//!
//! This module defines how a spawned control loop task ends.

/// Outcome of a control loop task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopOutcome {
    /// Cancellation was observed - the normal way a loop ends
    Cancelled,
    /// A poll cycle failed and the loop terminated without retrying
    Failed(String),
}

impl LoopOutcome {
    /// Whether the loop ended because of an error
    pub fn is_failure(&self) -> bool {
        matches!(self, LoopOutcome::Failed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_outcome_variants() {
        assert_eq!(LoopOutcome::Cancelled, LoopOutcome::Cancelled);
        assert_eq!(LoopOutcome::Failed("test".into()), LoopOutcome::Failed("test".into()));
        assert_ne!(LoopOutcome::Cancelled, LoopOutcome::Failed("test".into()));
    }

    #[test]
    fn test_is_failure() {
        assert!(!LoopOutcome::Cancelled.is_failure());
        assert!(LoopOutcome::Failed("board offline".into()).is_failure());
    }
}
