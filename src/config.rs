use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use plant_watering::controller::ControllerOptions;
use plant_watering::manager::StartPolicy;
use plant_watering::resource::ComponentConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub controller: ComponentConfig,
    pub control_loop: ControlLoopConfig,
    pub board: BoardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlLoopConfig {
    pub settle_ms: u64,
    pub start_policy: StartPolicy,
    pub shutdown_grace_ms: u64,
}

impl Default for ControlLoopConfig {
    fn default() -> Self {
        Self {
            settle_ms: 1000,
            start_policy: StartPolicy::Guarded,
            shutdown_grace_ms: 5000,
        }
    }
}

impl ControlLoopConfig {
    pub fn options(&self) -> ControllerOptions {
        ControllerOptions {
            settle: Duration::from_millis(self.settle_ms),
            start_policy: self.start_policy,
            shutdown_grace: Duration::from_millis(self.shutdown_grace_ms),
        }
    }
}

/// In-memory board served to the controller by the binary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub name: String,
    pub strict_pins: bool,
    pub pins: BTreeMap<String, bool>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            name: "local".to_string(),
            strict_pins: false,
            pins: BTreeMap::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            controller: ComponentConfig::new("watering").with_attribute("board_name", "local"),
            control_loop: ControlLoopConfig::default(),
            board: BoardConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let project_name = env!("CARGO_PKG_NAME");
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Read a bare `ComponentConfig` (name + attributes) from YAML or JSON
pub fn load_component(path: &Path) -> Result<ComponentConfig> {
    let content = fs::read_to_string(path).context(format!("Failed to read {}", path.display()))?;
    serde_yaml::from_str(&content).context(format!("Failed to parse {}", path.display()))
}
