//! Chart specifications
//!
//! Renderer-agnostic descriptions of the two dashboard charts. Drawing is left
//! to whatever consumes the JSON.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::ledger::Ledger;
use crate::reports::{expense_distribution, MonthlySummary};

/// One named series in a bar chart, aligned with the chart's categories
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub name: String,
    pub values: Vec<Decimal>,
}

/// Grouped bar chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// X axis labels (`YYYY-MM`)
    pub categories: Vec<String>,
    pub series: Vec<ChartSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: Decimal,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChartSpec {
    pub title: String,
    pub slices: Vec<PieSlice>,
}

/// Income vs expense per month, months ascending
pub fn income_expense_bars(summary: &MonthlySummary) -> BarChartSpec {
    let categories = summary.keys().map(|m| m.to_string()).collect();
    let income = summary.values().map(|t| t.income).collect();
    let expense = summary.values().map(|t| t.expense).collect();

    BarChartSpec {
        title: "Monthly Income vs Expense".to_string(),
        x_label: "Month".to_string(),
        y_label: "Amount".to_string(),
        categories,
        series: vec![
            ChartSeries {
                name: "Income".to_string(),
                values: income,
            },
            ChartSeries {
                name: "Expense".to_string(),
                values: expense,
            },
        ],
    }
}

/// Share of total expenses by category
pub fn expense_pie(ledger: &Ledger) -> PieChartSpec {
    PieChartSpec {
        title: "Expense Distribution by Category".to_string(),
        slices: expense_distribution(ledger)
            .into_iter()
            .map(|share| PieSlice {
                label: share.category,
                value: share.amount,
                percent: share.percent,
            })
            .collect(),
    }
}
