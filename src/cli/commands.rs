//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - run: run the controller, reading commands from stdin
//! - validate: validate an attribute file and list its dependencies

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// plant-watering - mirror a moisture sensor onto a relay
#[derive(Parser, Debug)]
#[command(name = "plant-watering")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the controller; commands are read as JSON lines from stdin
    Run {
        /// Override the auto_start attribute
        #[arg(long)]
        no_auto_start: bool,

        /// Override the settle duration in milliseconds
        #[arg(long)]
        settle_ms: Option<u64>,
    },

    /// Validate controller attributes and print implicit dependencies
    Validate {
        /// File holding `name` and `attributes` (YAML or JSON); defaults to the config's controller section
        file: Option<PathBuf>,
    },
}
