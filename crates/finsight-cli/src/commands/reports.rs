//! Report command implementations

use std::path::Path;

use anyhow::{Context, Result};
use finsight_core::charts::{expense_pie, income_expense_bars};
use finsight_core::reports::{
    monthly_category_pivot, monthly_summary, top_categories, totals_by_type, CategoryPivot,
    MonthlySummary, TypeTotals,
};
use finsight_core::{describe_alert, format_currency, BudgetReport, Config, Dashboard, Ledger};

use super::{load_ledger, truncate};

const TOP_CATEGORIES: usize = 3;

pub fn cmd_summary(file: &Path, config: &Config) -> Result<()> {
    let ledger = load_ledger(file)?;
    let totals = totals_by_type(&ledger);
    let summary = monthly_summary(&ledger);

    println!();
    println!("📊 Financial Summary");
    print!("{}", format_totals(&totals, &config.currency));
    println!();
    print!("{}", format_monthly_summary(&summary, &config.currency));
    Ok(())
}

pub fn cmd_pivot(file: &Path, config: &Config) -> Result<()> {
    let ledger = load_ledger(file)?;
    let pivot = monthly_category_pivot(&ledger);

    println!();
    println!("🗂️  Monthly Expenses by Category");
    if pivot.is_empty() {
        println!("   No expenses found.");
        return Ok(());
    }
    print!("{}", format_pivot(&pivot, &config.currency));
    Ok(())
}

/// Print both chart specs as one JSON document
pub fn cmd_charts(file: &Path) -> Result<()> {
    let ledger = load_ledger(file)?;
    let charts = serde_json::json!({
        "income_expense": income_expense_bars(&monthly_summary(&ledger)),
        "expense_distribution": expense_pie(&ledger),
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&charts).context("Failed to serialize charts")?
    );
    Ok(())
}

pub fn cmd_dashboard(file: &Path, config: &Config, json: bool) -> Result<()> {
    let ledger = load_ledger(file)?;
    let budgets = config.budget_set(&ledger)?;
    let dashboard = Dashboard::build(&ledger, &budgets);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&dashboard).context("Failed to serialize dashboard")?
        );
        return Ok(());
    }

    print!("{}", format_dashboard(&dashboard, &ledger, &config.currency));
    Ok(())
}

/// Income / expense / net block
pub fn format_totals(totals: &TypeTotals, currency: &str) -> String {
    format!(
        "   Total Income:   {:>12}\n   Total Expenses: {:>12}\n   Net Savings:    {:>12}\n",
        format_currency(totals.income, currency),
        format_currency(totals.expense, currency),
        format_currency(totals.net(), currency)
    )
}

pub fn format_monthly_summary(summary: &MonthlySummary, currency: &str) -> String {
    let mut out = format!(
        "   {:8} │ {:>12} │ {:>12} │ {:>12}\n",
        "Month", "Income", "Expense", "Net"
    );
    out.push_str("   ─────────┼──────────────┼──────────────┼─────────────\n");
    for (month, row) in summary {
        out.push_str(&format!(
            "   {:8} │ {:>12} │ {:>12} │ {:>12}\n",
            month.to_string(),
            format_currency(row.income, currency),
            format_currency(row.expense, currency),
            format_currency(row.net, currency)
        ));
    }
    out
}

/// Month × category table; "-" marks a pair with no expenses
pub fn format_pivot(pivot: &CategoryPivot, currency: &str) -> String {
    let mut categories: Vec<&str> = pivot
        .values()
        .flat_map(|row| row.categories.keys().map(String::as_str))
        .collect();
    categories.sort_unstable();
    categories.dedup();

    let mut out = format!("   {:8}", "Month");
    for category in &categories {
        out.push_str(&format!(" │ {:>13}", truncate(category, 13)));
    }
    out.push_str(&format!(" │ {:>13}\n", "Total"));

    for (month, row) in pivot {
        out.push_str(&format!("   {:8}", month.to_string()));
        for category in &categories {
            let cell = row
                .categories
                .get(*category)
                .map(|amount| format_currency(*amount, currency))
                .unwrap_or_else(|| "-".to_string());
            out.push_str(&format!(" │ {:>13}", cell));
        }
        out.push_str(&format!(" │ {:>13}\n", format_currency(row.total, currency)));
    }
    out
}

pub fn format_dashboard(dashboard: &Dashboard, ledger: &Ledger, currency: &str) -> String {
    let mut out = String::from("\n💰 Finsight Dashboard\n");
    let Some((from, to)) = dashboard.date_range else {
        out.push_str("   No transactions.\n");
        return out;
    };
    out.push_str(&format!(
        "   {} transactions from {} to {}\n",
        dashboard.transaction_count, from, to
    ));
    out.push_str("   ─────────────────────────────────────────────\n");

    let totals = TypeTotals {
        income: dashboard.totals.income,
        expense: dashboard.totals.expense,
    };
    out.push_str(&format_totals(&totals, currency));

    let top = top_categories(ledger, TOP_CATEGORIES);
    if !top.is_empty() {
        out.push_str("\n   Top spending categories:\n");
        for (category, amount) in &top {
            out.push_str(&format!(
                "     {:15} {:>12}\n",
                category,
                format_currency(*amount, currency)
            ));
        }
    }

    out.push('\n');
    out.push_str(&format_budget_report(&dashboard.budget_report, currency));
    out
}

/// One line per alert, or the all-clear line
pub fn format_budget_report(report: &BudgetReport, currency: &str) -> String {
    match report {
        BudgetReport::NoOverspending => {
            "✅ No overspending detected for any category.\n".to_string()
        }
        BudgetReport::Overspending(alerts) => alerts
            .iter()
            .map(|alert| format!("🔴 {}\n", describe_alert(alert, currency)))
            .collect(),
    }
}
