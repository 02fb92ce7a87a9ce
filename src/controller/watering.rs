//! Host-facing watering controller.
//!
//! Ties a [`ConfigState`] to a [`ControlLoopManager`]: construction and
//! reconfiguration validate and apply attributes, and start the loop when
//! `auto_start` is set. Commands arrive through [`WateringController::do_command`].

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use serde_json::{Map, Value};

use super::config_state::{ConfigState, WateringConfig, validate_config};
use crate::board::Board;
use crate::cycle::{DEFAULT_SETTLE, PollCycle};
use crate::domain::{Command, Diagnostics, LoopStatus};
use crate::error::{Result, WateringError};
use crate::manager::{ControlLoopManager, StartPolicy, current_runtime};
use crate::resource::{ComponentConfig, Dependencies, ResourceName};

/// Model triplet the controller registers under
pub const MODEL: &str = "devrel:watering-controller:plant-watering";

/// Default bound on how long `close()` waits for the loop to exit
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Tuning that does not come from host attributes
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub settle: Duration,
    pub start_policy: StartPolicy,
    pub shutdown_grace: Duration,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            settle: DEFAULT_SETTLE,
            start_policy: StartPolicy::default(),
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
        }
    }
}

/// Mirrors a moisture sensor onto a relay while running
pub struct WateringController {
    name: String,
    config: ConfigState,
    manager: ControlLoopManager,
    shutdown_grace: Duration,
}

impl WateringController {
    /// Validate `config`, return the dependencies the host must resolve
    pub fn validate_config(config: &ComponentConfig) -> Result<Vec<String>> {
        validate_config(config)
    }

    /// Construct a controller and apply the initial configuration
    pub fn new(
        config: &ComponentConfig,
        dependencies: &Dependencies,
        options: ControllerOptions,
    ) -> Result<Self> {
        let initial = Self::build_config(config, dependencies)?;
        let auto_start = initial.auto_start;
        let state = ConfigState::new(initial);
        let manager = ControlLoopManager::new(
            state.clone(),
            PollCycle::new(options.settle),
            options.start_policy,
        );

        let controller = Self {
            name: config.name.clone(),
            config: state,
            manager,
            shutdown_grace: options.shutdown_grace,
        };
        info!("Created {} controller {}", MODEL, controller.name);

        if auto_start {
            controller.manager.start()?;
        }
        Ok(controller)
    }

    fn build_config(config: &ComponentConfig, dependencies: &Dependencies) -> Result<WateringConfig> {
        let implicit = validate_config(config)?;
        let board_name = implicit
            .first()
            .ok_or_else(|| WateringError::configuration("board_name did not resolve"))?;
        let board: Arc<dyn Board> = dependencies.board(board_name).ok_or_else(|| {
            WateringError::unavailable(format!(
                "dependency {} was not provided",
                ResourceName::board(board_name)
            ))
        })?;
        WateringConfig::from_attributes(config, board)
    }

    /// Replace the configuration; starts the loop when `auto_start` is set.
    ///
    /// Nothing is applied if the loop could not be started.
    pub fn reconfigure(&self, config: &ComponentConfig, dependencies: &Dependencies) -> Result<()> {
        let next = Self::build_config(config, dependencies)?;
        if next.auto_start {
            current_runtime()?;
        }
        let applied = self.config.replace(next);
        info!("Reconfigured {}: {:?}", self.name, applied);

        if applied.auto_start {
            self.manager.start()?;
        }
        Ok(())
    }

    /// Execute each recognized command once, in submitted order.
    ///
    /// Every submitted name appears in the response: `true` when recognized
    /// and executed, `false` otherwise. Arguments are ignored.
    pub async fn do_command(&self, command: &Map<String, Value>) -> Map<String, Value> {
        let mut result = Map::new();
        for name in command.keys() {
            let parsed = Command::parse(name);
            if let Some(cmd) = parsed {
                debug!("{} executing {}", self.name, cmd.as_str());
            }
            let executed = match parsed {
                Some(Command::Start) => match self.manager.start() {
                    Ok(_) => true,
                    Err(e) => {
                        warn!("start command failed: {}", e);
                        false
                    }
                },
                Some(Command::Stop) => {
                    self.manager.stop();
                    true
                }
                None => false,
            };
            result.insert(name.clone(), Value::Bool(executed));
        }
        result
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current configuration snapshot
    pub fn config(&self) -> Arc<WateringConfig> {
        self.config.current()
    }

    pub fn status(&self) -> LoopStatus {
        self.manager.status()
    }

    pub fn manager(&self) -> &ControlLoopManager {
        &self.manager
    }

    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            status: self.manager.status(),
            running_tasks: self.manager.running_tasks(),
            cycles_completed: self.manager.cycles_completed(),
            failed_loops: self.manager.failed_loops(),
            last_report: self.manager.last_report(),
        }
    }

    /// Stop the loop and wait (bounded) for it to exit.
    ///
    /// Call on every exit path; safe to call repeatedly.
    pub async fn close(&self) {
        if !self.manager.stop_and_wait(self.shutdown_grace).await {
            warn!("Controller {} closed before its loop exited", self.name);
        }
        info!("Controller {} closed", self.name);
    }
}
