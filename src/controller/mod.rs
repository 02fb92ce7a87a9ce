//! Watering controller
//!
//! - config_state: attribute validation, the immutable `WateringConfig`,
//!   and the `ConfigState` cell read by the control loop
//! - watering: the host-facing controller (construct, reconfigure, commands, close)

mod config_state;
mod watering;

pub use config_state::{
    AUTO_START_ATTR, BOARD_NAME_ATTR, ConfigState, DEFAULT_AUTO_START, DEFAULT_RELAY_PIN,
    DEFAULT_SENSOR_PIN, RELAY_PIN_ATTR, SENSOR_PIN_ATTR, WateringConfig, validate_config,
};
pub use watering::{ControllerOptions, DEFAULT_SHUTDOWN_GRACE, MODEL, WateringController};
