//! Finsight CLI - Personal finance dashboard
//!
//! Usage:
//!   finsight --file ledger.csv summary      Totals and monthly breakdown
//!   finsight --file ledger.csv alerts       Budget overspending alerts
//!   finsight --file ledger.csv ask "..."    Ask about your spending
//!   finsight --file ledger.csv insights     AI advice for the whole ledger

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Summary => commands::cmd_summary(&cli.file, &config),
        Commands::Pivot => commands::cmd_pivot(&cli.file, &config),
        Commands::Alerts {
            budgets,
            default_budget,
        } => commands::cmd_alerts(&cli.file, &config, &budgets, default_budget),
        Commands::Charts => commands::cmd_charts(&cli.file),
        Commands::Dashboard { json } => commands::cmd_dashboard(&cli.file, &config, json),
        Commands::Ask { question } => {
            commands::cmd_ask(&cli.file, &config, &question.join(" ")).await
        }
        Commands::Insights => commands::cmd_insights(&cli.file, &config).await,
        Commands::AdvisorTest { model } => {
            commands::cmd_advisor_test(&config, model.as_deref()).await
        }
        Commands::Prompts { action } => match action {
            None | Some(PromptsAction::List) => commands::cmd_prompts_list(),
            Some(PromptsAction::Show { id }) => commands::cmd_prompts_show(&id),
            Some(PromptsAction::Path) => commands::cmd_prompts_path(),
        },
    }
}
