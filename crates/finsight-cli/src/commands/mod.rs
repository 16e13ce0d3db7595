//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (config, ledger and advisor loading)
//! - `reports` - Summary, pivot, charts and dashboard output
//! - `alerts` - Budget overspending alerts
//! - `advisor` - Questions, insights and backend checks
//! - `prompts` - Prompt library management commands

pub mod advisor;
pub mod alerts;
pub mod core;
pub mod prompts;
pub mod reports;

// Re-export command functions for main.rs
pub use advisor::*;
pub use alerts::*;
pub use core::*;
pub use prompts::*;
pub use reports::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
