//! Controller configuration: validation, the immutable [`WateringConfig`],
//! and the [`ConfigState`] cell the control loop reads from.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::board::Board;
use crate::error::Result;
use crate::resource::ComponentConfig;
use crate::resource::attributes::{optional_bool, optional_string, required_string};

/// Attribute naming the board dependency
pub const BOARD_NAME_ATTR: &str = "board_name";
/// Attribute controlling auto-start on (re)configure
pub const AUTO_START_ATTR: &str = "auto_start";
/// Attribute naming the moisture sensor pin
pub const SENSOR_PIN_ATTR: &str = "sensor_pin";
/// Attribute naming the relay pin
pub const RELAY_PIN_ATTR: &str = "relay_pin";

/// Default sensor pin identifier
pub const DEFAULT_SENSOR_PIN: &str = "40";
/// Default relay pin identifier
pub const DEFAULT_RELAY_PIN: &str = "8";
/// Default auto-start policy
pub const DEFAULT_AUTO_START: bool = true;

/// Validate raw attributes and return the implicit dependencies.
///
/// The only dependency is the board named by `board_name`; the host must
/// resolve it before constructing or reconfiguring the controller.
pub fn validate_config(config: &ComponentConfig) -> Result<Vec<String>> {
    let board_name = required_string(&config.attributes, BOARD_NAME_ATTR)?;
    Ok(vec![board_name])
}

/// One immutable configuration generation
#[derive(Clone)]
pub struct WateringConfig {
    pub board: Arc<dyn Board>,
    pub board_name: String,
    pub sensor_pin: String,
    pub relay_pin: String,
    pub auto_start: bool,
}

impl WateringConfig {
    /// Build a configuration from attributes and an already-resolved board
    pub fn from_attributes(config: &ComponentConfig, board: Arc<dyn Board>) -> Result<Self> {
        let attrs = &config.attributes;
        Ok(Self {
            board_name: required_string(attrs, BOARD_NAME_ATTR)?,
            sensor_pin: optional_string(attrs, SENSOR_PIN_ATTR, DEFAULT_SENSOR_PIN)?,
            relay_pin: optional_string(attrs, RELAY_PIN_ATTR, DEFAULT_RELAY_PIN)?,
            auto_start: optional_bool(attrs, AUTO_START_ATTR, DEFAULT_AUTO_START)?,
            board,
        })
    }
}

impl fmt::Debug for WateringConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WateringConfig")
            .field("board_name", &self.board_name)
            .field("sensor_pin", &self.sensor_pin)
            .field("relay_pin", &self.relay_pin)
            .field("auto_start", &self.auto_start)
            .finish_non_exhaustive()
    }
}

/// Shared cell holding the current configuration.
///
/// Cloning yields another handle to the same cell. Readers take a snapshot
/// per cycle, so a replacement is picked up on the next cycle and never
/// observed half-applied.
#[derive(Debug, Clone)]
pub struct ConfigState {
    current: Arc<RwLock<Arc<WateringConfig>>>,
}

impl ConfigState {
    pub fn new(config: WateringConfig) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(config))),
        }
    }

    /// Snapshot of the current configuration
    pub fn current(&self) -> Arc<WateringConfig> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Atomically replace the configuration, returning the new snapshot
    pub fn replace(&self, config: WateringConfig) -> Arc<WateringConfig> {
        let next = Arc::new(config);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = next.clone();
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::MemoryBoard;
    use crate::error::WateringError;

    fn board(name: &str) -> Arc<dyn Board> {
        Arc::new(MemoryBoard::new(name))
    }

    #[test]
    fn test_validate_returns_board_dependency() {
        let config = ComponentConfig::new("w").with_attribute("board_name", "b1");
        assert_eq!(validate_config(&config).unwrap(), vec!["b1".to_string()]);
    }

    #[test]
    fn test_validate_ignores_other_attributes() {
        let config = ComponentConfig::new("w")
            .with_attribute("board_name", "b1")
            .with_attribute("sensor_pin", "3")
            .with_attribute("auto_start", false);
        assert_eq!(validate_config(&config).unwrap(), vec!["b1".to_string()]);
    }

    #[test]
    fn test_validate_missing_board_name() {
        let config = ComponentConfig::new("w").with_attribute("sensor_pin", "3");
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, WateringError::Configuration(_)));
    }

    #[test]
    fn test_defaults() {
        let raw = ComponentConfig::new("w").with_attribute("board_name", "pi");
        let config = WateringConfig::from_attributes(&raw, board("pi")).unwrap();
        assert_eq!(config.board_name, "pi");
        assert_eq!(config.sensor_pin, "40");
        assert_eq!(config.relay_pin, "8");
        assert!(config.auto_start);
        assert_eq!(config.board.name(), "pi");
    }

    #[test]
    fn test_explicit_values() {
        let raw = ComponentConfig::new("w")
            .with_attribute("board_name", "pi")
            .with_attribute("sensor_pin", 37)
            .with_attribute("relay_pin", "11")
            .with_attribute("auto_start", false);
        let config = WateringConfig::from_attributes(&raw, board("pi")).unwrap();
        assert_eq!(config.sensor_pin, "37");
        assert_eq!(config.relay_pin, "11");
        assert!(!config.auto_start);
    }

    #[test]
    fn test_debug_omits_board_handle() {
        let raw = ComponentConfig::new("w").with_attribute("board_name", "pi");
        let config = WateringConfig::from_attributes(&raw, board("pi")).unwrap();
        let debug = format!("{:?}", config);
        assert!(debug.contains("sensor_pin: \"40\""));
        assert!(debug.ends_with(".. }"));
    }

    #[test]
    fn test_replace_is_visible_to_clones() {
        let raw = ComponentConfig::new("w").with_attribute("board_name", "pi");
        let state = ConfigState::new(WateringConfig::from_attributes(&raw, board("pi")).unwrap());
        let reader = state.clone();
        let before = reader.current();

        let raw = raw.with_attribute("relay_pin", "12");
        state.replace(WateringConfig::from_attributes(&raw, board("pi")).unwrap());

        assert_eq!(before.relay_pin, "8");
        assert_eq!(reader.current().relay_pin, "12");
    }
}
