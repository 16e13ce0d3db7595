//! Shared command utilities
//!
//! - `load_config` - Resolve the config file (with environment overrides)
//! - `load_ledger` - Read and normalize the ledger CSV
//! - `build_advisor` - Advisor for the configured backend, if any

use std::path::Path;

use anyhow::{Context, Result};
use finsight_core::{read_ledger, Advisor, Config, Ledger};
use tracing::{debug, info};

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = Config::load(path).context("Failed to load config")?;
    match config.source {
        Some(ref source) => debug!(path = %source.display(), "Using config file"),
        None => debug!("Using built-in config"),
    }
    Ok(config)
}

pub fn load_ledger(path: &Path) -> Result<Ledger> {
    let ledger = read_ledger(path)
        .with_context(|| format!("Failed to load ledger from {}", path.display()))?;
    info!(transactions = ledger.len(), "Loaded ledger");
    Ok(ledger)
}

/// Advisor for the configured backend; `None` when no host is set
pub fn build_advisor(config: &Config) -> Option<Advisor> {
    let advisor = Advisor::from_config(config);
    if advisor.is_none() {
        debug!(backend = ?config.advisor.backend, "No advisor host configured");
    }
    advisor
}
