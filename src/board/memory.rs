//! In-memory board implementation.
//!
//! Used by the binary when no physical board is attached and by tests to
//! observe exactly which pin operations a cycle performed, and in what order.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::traits::{Board, GpioPin};
use crate::error::{Result, WateringError};

/// A recorded pin operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PinOp {
    /// A read returning `value`
    Get { pin: String, value: bool },
    /// A write of `value`
    Set { pin: String, value: bool },
}

#[derive(Debug, Default)]
struct BoardState {
    levels: Mutex<HashMap<String, bool>>,
    ops: Mutex<Vec<PinOp>>,
    offline: AtomicBool,
}

impl BoardState {
    fn levels(&self) -> MutexGuard<'_, HashMap<String, bool>> {
        self.levels.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ops(&self) -> MutexGuard<'_, Vec<PinOp>> {
        self.ops.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_online(&self, board: &str) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(WateringError::unavailable(format!(
                "board {} is unreachable",
                board
            )));
        }
        Ok(())
    }
}

/// Board whose pins are plain booleans held in memory
#[derive(Debug, Clone)]
pub struct MemoryBoard {
    name: String,
    strict: bool,
    state: Arc<BoardState>,
}

impl MemoryBoard {
    /// Create a lenient board: unknown pins are created low on first use
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            strict: false,
            state: Arc::new(BoardState::default()),
        }
    }

    /// Only pins declared with [`MemoryBoard::with_pin`] can be resolved
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Declare a pin with an initial level
    pub fn with_pin(self, pin: impl Into<String>, level: bool) -> Self {
        self.state.levels().insert(pin.into(), level);
        self
    }

    /// Change a pin level from outside, as a physical sensor would
    pub fn set_level(&self, pin: &str, level: bool) {
        self.state.levels().insert(pin.to_string(), level);
    }

    /// Current level of a pin, if it exists
    pub fn level(&self, pin: &str) -> Option<bool> {
        self.state.levels().get(pin).copied()
    }

    /// Mark the board unreachable; every pin operation fails until restored
    pub fn set_offline(&self, offline: bool) {
        self.state.offline.store(offline, Ordering::SeqCst);
    }

    /// Snapshot of all recorded operations, oldest first
    pub fn operations(&self) -> Vec<PinOp> {
        self.state.ops().clone()
    }

    /// Number of recorded operations
    pub fn operation_count(&self) -> usize {
        self.state.ops().len()
    }
}

#[async_trait]
impl Board for MemoryBoard {
    fn name(&self) -> &str {
        &self.name
    }

    async fn gpio_pin_by_name(&self, name: &str) -> Result<Arc<dyn GpioPin>> {
        self.state.ensure_online(&self.name)?;

        {
            let mut levels = self.state.levels();
            if !levels.contains_key(name) {
                if self.strict {
                    return Err(WateringError::unavailable(format!(
                        "pin {} not found on board {}",
                        name, self.name
                    )));
                }
                levels.insert(name.to_string(), false);
            }
        }

        Ok(Arc::new(MemoryPin {
            board: self.name.clone(),
            pin: name.to_string(),
            state: self.state.clone(),
        }))
    }
}

struct MemoryPin {
    board: String,
    pin: String,
    state: Arc<BoardState>,
}

#[async_trait]
impl GpioPin for MemoryPin {
    async fn get(&self) -> Result<bool> {
        self.state.ensure_online(&self.board)?;
        let value = self.state.levels().get(&self.pin).copied().unwrap_or(false);
        self.state.ops().push(PinOp::Get {
            pin: self.pin.clone(),
            value,
        });
        Ok(value)
    }

    async fn set(&self, high: bool) -> Result<()> {
        self.state.ensure_online(&self.board)?;
        self.state.levels().insert(self.pin.clone(), high);
        self.state.ops().push(PinOp::Set {
            pin: self.pin.clone(),
            value: high,
        });
        Ok(())
    }
}
