//! Host resource plumbing
//!
//! A controller is configured from a [`ComponentConfig`] (a name plus an
//! opaque attribute map) and receives the resources it depends on through
//! [`Dependencies`], keyed by [`ResourceName`].

pub mod attributes;
mod dependencies;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use dependencies::{Dependencies, ResourceName};

/// Raw configuration handed over by the host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentConfig {
    /// Instance name of the controller
    pub name: String,
    /// Free-form attributes
    pub attributes: Map<String, Value>,
}

impl ComponentConfig {
    /// Create an empty config with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Map::new(),
        }
    }

    /// Set an attribute
    pub fn with_attribute(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_with_attribute() {
        let config = ComponentConfig::new("watering")
            .with_attribute("board_name", "local")
            .with_attribute("auto_start", false);

        assert_eq!(config.name, "watering");
        assert_eq!(config.attributes["board_name"], json!("local"));
        assert_eq!(config.attributes["auto_start"], json!(false));
    }

    #[test]
    fn test_deserialize_from_yaml() {
        let yaml = r#"
name: bed-1
attributes:
  board_name: pi
  sensor_pin: 37
"#;
        let config: ComponentConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.name, "bed-1");
        assert_eq!(config.attributes["board_name"], json!("pi"));
        assert_eq!(config.attributes["sensor_pin"], json!(37));
    }

    #[test]
    fn test_missing_fields_default() {
        let config: ComponentConfig = serde_json::from_str("{}").unwrap();
        assert!(config.name.is_empty());
        assert!(config.attributes.is_empty());
    }
}
