//! CLI module for plant-watering - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for running the controller
//! and validating attribute files.

pub mod commands;

pub use commands::Cli;
