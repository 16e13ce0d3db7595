//! Everything the dashboard shows for one ledger, computed in one pass

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::alerts::evaluate_budgets;
use crate::budget::BudgetSet;
use crate::charts::{expense_pie, income_expense_bars, BarChartSpec, PieChartSpec};
use crate::ledger::Ledger;
use crate::models::BudgetReport;
use crate::reports::{
    category_totals, monthly_category_pivot, monthly_summary, totals_by_type, CategoryPivot,
    CategoryTotals, MonthlySummary,
};

/// Headline totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardTotals {
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

/// Dashboard snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub transaction_count: usize,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub totals: DashboardTotals,
    pub monthly_summary: MonthlySummary,
    pub category_pivot: CategoryPivot,
    pub category_totals: CategoryTotals,
    pub income_expense_chart: BarChartSpec,
    pub expense_chart: PieChartSpec,
    pub budget_report: BudgetReport,
}

impl Dashboard {
    pub fn build(ledger: &Ledger, budgets: &BudgetSet) -> Self {
        let totals = totals_by_type(ledger);
        let summary = monthly_summary(ledger);
        let income_expense_chart = income_expense_bars(&summary);

        Self {
            transaction_count: ledger.len(),
            date_range: ledger.date_range(),
            totals: DashboardTotals {
                income: totals.income,
                expense: totals.expense,
                net: totals.net(),
            },
            monthly_summary: summary,
            category_pivot: monthly_category_pivot(ledger),
            category_totals: category_totals(ledger),
            income_expense_chart,
            expense_chart: expense_pie(ledger),
            budget_report: evaluate_budgets(ledger, budgets),
        }
    }
}
