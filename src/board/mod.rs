//! Hardware abstraction boundary
//!
//! The controller never talks to hardware directly. A [`Board`] turns a pin
//! identifier into a [`GpioPin`] handle, and the handle exposes boolean
//! reads and writes. Boards are owned by the host; the controller only
//! borrows them through `Arc`.

mod memory;
mod traits;

pub use memory::{MemoryBoard, PinOp};
pub use traits::{Board, GpioPin};
