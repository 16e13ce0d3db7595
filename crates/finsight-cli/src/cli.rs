//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use finsight_core::budget::parse_budget_override;
use rust_decimal::Decimal;

/// Finsight - See where your money goes
#[derive(Parser)]
#[command(name = "finsight")]
#[command(about = "Personal finance dashboard with budget alerts and a local AI advisor", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Ledger CSV with Date, Amount, Type and Category columns
    #[arg(short, long, default_value = "sample_data.csv", global = true)]
    pub file: PathBuf,

    /// Config file (defaults to ~/.config/finsight/config.toml, then built-in defaults)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Income, expense and net totals with a month-by-month breakdown
    Summary,

    /// Monthly expenses by category
    Pivot,

    /// Check monthly category spending against budgets
    Alerts {
        /// Budget for one category, e.g. --budget Food=4000 (repeatable)
        #[arg(short, long = "budget", value_name = "CATEGORY=AMOUNT", value_parser = parse_budget_arg)]
        budgets: Vec<(String, Decimal)>,

        /// Budget for every category without an explicit one
        #[arg(long, value_name = "AMOUNT")]
        default_budget: Option<Decimal>,
    },

    /// Print the income/expense bar chart and expense pie chart as JSON
    Charts,

    /// Overview of totals, top categories and budget alerts
    Dashboard {
        /// Print the full dashboard as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ask a question, e.g. "How much did I spend on food last month?"
    Ask {
        /// The question (quotes optional)
        #[arg(num_args = 0.., trailing_var_arg = true)]
        question: Vec<String>,
    },

    /// Get AI advice based on your income, expenses and top categories
    Insights,

    /// Manage advisor prompts
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },

    /// Check the configured advisor backend and run a short completion
    AdvisorTest {
        /// Override the configured model
        #[arg(short, long)]
        model: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List all prompts and their override status
    List,

    /// Show the content of a prompt
    Show {
        /// Prompt ID (financial_insights, custom_question)
        id: String,
    },

    /// Print the directory for prompt overrides
    Path,
}

fn parse_budget_arg(s: &str) -> Result<(String, Decimal), String> {
    parse_budget_override(s).map_err(|e| e.to_string())
}
