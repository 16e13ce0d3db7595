//! Budget alert command

use std::path::Path;

use anyhow::{bail, Result};
use finsight_core::{evaluate_budgets, BudgetReport, BudgetSet, Config, Ledger};
use rust_decimal::Decimal;
use tracing::debug;

use super::{format_budget_report, load_ledger};

pub fn cmd_alerts(
    file: &Path,
    config: &Config,
    overrides: &[(String, Decimal)],
    default_budget: Option<Decimal>,
) -> Result<()> {
    let ledger = load_ledger(file)?;
    let report = check_budgets(&ledger, config, overrides, default_budget)?;

    println!();
    println!("🚨 Budget Alerts");
    print!("{}", format_budget_report(&report, &config.currency));
    Ok(())
}

/// Resolve budgets (config, then --default-budget, then --budget) and evaluate them
pub fn check_budgets(
    ledger: &Ledger,
    config: &Config,
    overrides: &[(String, Decimal)],
    default_budget: Option<Decimal>,
) -> Result<BudgetReport> {
    let mut budgets = match default_budget {
        Some(amount) if amount < Decimal::ZERO => {
            bail!("Default budget must not be negative: {}", amount)
        }
        Some(amount) => {
            let mut budgets = BudgetSet::for_ledger(ledger, amount);
            for (category, limit) in &config.budgets.categories {
                budgets.set(category.as_str(), *limit)?;
            }
            budgets
        }
        None => config.budget_set(ledger)?,
    };

    for (category, amount) in overrides {
        debug!(category = %category, amount = %amount, "Budget override");
        budgets.set(category.as_str(), *amount)?;
    }

    Ok(evaluate_budgets(ledger, &budgets))
}
