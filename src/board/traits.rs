//! Board and pin traits consumed by the poll cycle.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

/// A board that resolves named GPIO pins.
#[async_trait]
pub trait Board: Send + Sync {
    /// Resource name of this board (matches the `board_name` attribute)
    fn name(&self) -> &str;

    /// Resolve a pin handle by its identifier
    async fn gpio_pin_by_name(&self, name: &str) -> Result<Arc<dyn GpioPin>>;
}

/// A single boolean GPIO line.
#[async_trait]
pub trait GpioPin: Send + Sync {
    /// Read the current level of the pin
    async fn get(&self) -> Result<bool>;

    /// Drive the pin high (`true`) or low (`false`)
    async fn set(&self, high: bool) -> Result<()>;
}
