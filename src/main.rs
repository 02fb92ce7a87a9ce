use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;

use plant_watering::board::MemoryBoard;
use plant_watering::controller::{AUTO_START_ATTR, WateringController};
use plant_watering::daemon::run_session;
use plant_watering::resource::{ComponentConfig, Dependencies};

mod cli;
mod config;

use cli::Cli;
use cli::commands::Commands;
use config::Config;

fn setup_logging(level: &str) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("plant-watering")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("plant-watering.log");

    // Setup env_logger with file output; stdout carries command replies
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn build_board(config: &Config) -> MemoryBoard {
    let mut board = MemoryBoard::new(config.board.name.clone());
    if config.board.strict_pins {
        board = board.strict();
    }
    for (pin, level) in &config.board.pins {
        board = board.with_pin(pin.clone(), *level);
    }
    board
}

async fn run_controller(config: &Config, no_auto_start: bool, settle_ms: Option<u64>) -> Result<()> {
    let mut component = config.controller.clone();
    if no_auto_start {
        component
            .attributes
            .insert(AUTO_START_ATTR.to_string(), serde_json::Value::Bool(false));
    }

    let mut options = config.control_loop.options();
    if let Some(ms) = settle_ms {
        options.settle = std::time::Duration::from_millis(ms);
    }

    let board = build_board(config);
    let dependencies = Dependencies::new().with_board(Arc::new(board));

    let controller =
        WateringController::new(&component, &dependencies, options).context("Failed to create controller")?;
    eprintln!(
        "{} {} ({})",
        "Controller ready:".green(),
        controller.name(),
        controller.status()
    );

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    let session = tokio::select! {
        result = run_session(&controller, stdin, stdout) => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };

    // Close on every path before reporting the session result
    controller.close().await;

    match session {
        Some(result) => {
            let summary = result.context("Command session failed")?;
            info!("Session ended: {:?}", summary);
        }
        None => {
            info!("Interrupted");
            eprintln!("{}", "Interrupted".yellow());
        }
    }

    let diagnostics = serde_json::to_string(&controller.diagnostics())?;
    eprintln!("{} {}", "Final state:".cyan(), diagnostics);
    Ok(())
}

fn handle_validate_command(file: Option<&PathBuf>, config: &Config) -> Result<()> {
    let component: ComponentConfig = match file {
        Some(path) => config::load_component(path)?,
        None => config.controller.clone(),
    };
    info!("Validating attributes for {}", component.name);

    match WateringController::validate_config(&component) {
        Ok(dependencies) => {
            println!("{} {}", "Valid:".green(), component.name);
            for dependency in dependencies {
                println!("  depends on: {}", dependency);
            }
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "Invalid:".red(), e);
            Err(e.into())
        }
    }
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        eprintln!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        None => run_controller(config, false, None).await,
        Some(Commands::Run {
            no_auto_start,
            settle_ms,
        }) => run_controller(config, *no_auto_start, *settle_ms).await,
        Some(Commands::Validate { file }) => handle_validate_command(file.as_ref(), config),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Setup logging
    let level = if cli.is_verbose() {
        "debug"
    } else {
        config.log_level.as_deref().unwrap_or("info")
    };
    setup_logging(level).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
