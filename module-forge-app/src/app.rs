//! Command line entry point shared by the `module-forge` binaries.

use crate::config::{AppConfig, Settings};
use crate::logging::init_logger;
use crate::setup::execution::run_standard_mode;
use anyhow::{Context, Result};
use clap::Parser;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Parses the command line, resolves settings and runs one fill.
pub fn main() -> Result<()> {
    let cli = AppConfig::parse();
    let settings = Settings::load(&cli).context("Failed to resolve settings")?;
    init_logger(&settings);

    log::info!("Module Forge starting");
    log::debug!("Resolved settings: {settings:?}");

    let shutdown_signal = Arc::new(AtomicBool::new(false));
    let outcome = run_standard_mode(&settings, shutdown_signal).context("Fill failed")?;

    log::info!(
        "Module Forge finished: {} slots, seed {}",
        outcome.grid.len(),
        outcome.summary.seed
    );
    Ok(())
}
