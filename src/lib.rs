//! plant-watering - a moisture-sensor to relay control loop
//!
//! A controller reads a moisture sensor pin and mirrors its level onto a
//! relay pin, once per cycle, for as long as its background loop runs. The
//! loop is started by configuration (`auto_start`) or by command, stopped by
//! command or by closing the controller, and picks up reconfiguration on its
//! next cycle.

pub mod board;
pub mod controller;
pub mod cycle;
pub mod daemon;
pub mod domain;
pub mod error;
pub mod manager;
pub mod resource;

pub use error::{Result, WateringError};
