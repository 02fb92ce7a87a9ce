//! Poll cycle implementation - mirrors the moisture sensor onto the relay.

use std::time::Duration;

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::controller::WateringConfig;
use crate::error::Result;

/// Default settle wait after writing and after reading back the relay
pub const DEFAULT_SETTLE: Duration = Duration::from_secs(1);

/// What a single cycle observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    /// Sensor reading, written to the relay
    pub should_water: bool,
    /// Relay state read back after the first settle wait
    pub watering: bool,
    /// When the cycle finished (after the second settle wait)
    pub finished_at: DateTime<Utc>,
}

/// PollCycle executes one iteration of the control loop.
///
/// Each iteration:
/// 1. Resolves the sensor and relay pins from the configured board
/// 2. Reads the sensor
/// 3. Writes the reading to the relay
/// 4. Waits the settle duration
/// 5. Reads the relay back (observability only)
/// 6. Waits the settle duration again
///
/// Any pin failure is returned immediately; there is no retry.
#[derive(Debug, Clone)]
pub struct PollCycle {
    settle: Duration,
}

impl Default for PollCycle {
    fn default() -> Self {
        Self::new(DEFAULT_SETTLE)
    }
}

impl PollCycle {
    pub fn new(settle: Duration) -> Self {
        Self { settle }
    }

    pub fn settle(&self) -> Duration {
        self.settle
    }

    /// Run one iteration against the given configuration snapshot.
    pub async fn run(&self, config: &WateringConfig) -> Result<CycleReport> {
        let sensor = config.board.gpio_pin_by_name(&config.sensor_pin).await?;
        let relay = config.board.gpio_pin_by_name(&config.relay_pin).await?;
        info!("Checking moisture sensor.");

        let should_water = sensor.get().await?;
        info!("Should water? {}", should_water);
        relay.set(should_water).await?;

        tokio::time::sleep(self.settle).await;
        let watering = relay.get().await?;
        info!("Currently watering? {}", watering);
        tokio::time::sleep(self.settle).await;

        Ok(CycleReport {
            should_water,
            watering,
            finished_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, MemoryBoard, PinOp};
    use crate::error::WateringError;
    use std::sync::Arc;

    fn config_for(board: &MemoryBoard) -> WateringConfig {
        WateringConfig {
            board: Arc::new(board.clone()) as Arc<dyn Board>,
            board_name: board.name().to_string(),
            sensor_pin: "40".to_string(),
            relay_pin: "8".to_string(),
            auto_start: false,
        }
    }

    #[test]
    fn test_default_settle() {
        assert_eq!(PollCycle::default().settle(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_wet_sensor_turns_relay_on_before_read_back() {
        let board = MemoryBoard::new("local").with_pin("40", true).with_pin("8", false);
        let cycle = PollCycle::new(Duration::from_millis(1));

        let report = cycle.run(&config_for(&board)).await.unwrap();

        assert!(report.should_water);
        assert!(report.watering);
        assert_eq!(
            board.operations(),
            vec![
                PinOp::Get {
                    pin: "40".to_string(),
                    value: true
                },
                PinOp::Set {
                    pin: "8".to_string(),
                    value: true
                },
                PinOp::Get {
                    pin: "8".to_string(),
                    value: true
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_dry_sensor_turns_relay_off() {
        let board = MemoryBoard::new("local").with_pin("40", false).with_pin("8", true);
        let cycle = PollCycle::new(Duration::from_millis(1));

        let report = cycle.run(&config_for(&board)).await.unwrap();

        assert!(!report.should_water);
        assert!(!report.watering);
        assert_eq!(board.level("8"), Some(false));
    }

    #[tokio::test]
    async fn test_unknown_pin_fails_without_touching_relay() {
        let board = MemoryBoard::new("local").strict().with_pin("8", false);
        let cycle = PollCycle::new(Duration::from_millis(1));

        let err = cycle.run(&config_for(&board)).await.unwrap_err();

        assert!(matches!(err, WateringError::ResourceUnavailable(_)));
        assert_eq!(board.operation_count(), 0);
    }

    #[tokio::test]
    async fn test_offline_board_propagates_error() {
        let board = MemoryBoard::new("local");
        board.set_offline(true);
        let cycle = PollCycle::new(Duration::from_millis(1));

        assert!(cycle.run(&config_for(&board)).await.is_err());
    }

    #[tokio::test]
    async fn test_cycle_waits_settle_twice() {
        let board = MemoryBoard::new("local");
        let settle = Duration::from_millis(20);
        let cycle = PollCycle::new(settle);

        let started = tokio::time::Instant::now();
        cycle.run(&config_for(&board)).await.unwrap();

        assert!(started.elapsed() >= settle * 2);
    }
}
