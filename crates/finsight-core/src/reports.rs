//! Spending reports and aggregation
//!
//! Every function here is a pure view over a [`Ledger`]. Results are
//! recomputed on demand; nothing is cached or patched in place.

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::ledger::Ledger;
use crate::models::{MonthBucket, TransactionType};

/// Income and expense totals across the ledger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeTotals {
    pub income: Decimal,
    pub expense: Decimal,
}

impl TypeTotals {
    pub fn net(&self) -> Decimal {
        self.income - self.expense
    }

    fn add(&mut self, kind: TransactionType, amount: Decimal) {
        match kind {
            TransactionType::Income => self.income += amount,
            TransactionType::Expense => self.expense += amount,
        }
    }
}

/// One row of the monthly summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonthTotals {
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

/// Month -> income / expense / net, months ascending
pub type MonthlySummary = BTreeMap<MonthBucket, MonthTotals>;

/// Expense sums for one month, by category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonthCategories {
    pub categories: BTreeMap<String, Decimal>,
    pub total: Decimal,
}

/// Month -> category -> expense sum, plus a per-month total
///
/// Only pairs with at least one expense row are present.
pub type CategoryPivot = BTreeMap<MonthBucket, MonthCategories>;

/// Category -> total expense across the ledger
pub type CategoryTotals = BTreeMap<String, Decimal>;

/// A category's share of total expenses
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount: Decimal,
    pub percent: f64,
}

pub fn totals_by_type(ledger: &Ledger) -> TypeTotals {
    let mut totals = TypeTotals::default();
    for tx in ledger {
        totals.add(tx.kind, tx.amount);
    }
    totals
}

pub fn monthly_summary(ledger: &Ledger) -> MonthlySummary {
    let mut by_month: BTreeMap<MonthBucket, TypeTotals> = BTreeMap::new();
    for tx in ledger {
        by_month.entry(tx.month()).or_default().add(tx.kind, tx.amount);
    }

    by_month
        .into_iter()
        .map(|(month, totals)| {
            (
                month,
                MonthTotals {
                    income: totals.income,
                    expense: totals.expense,
                    net: totals.net(),
                },
            )
        })
        .collect()
}

pub fn monthly_category_pivot(ledger: &Ledger) -> CategoryPivot {
    let mut pivot = CategoryPivot::new();
    for tx in ledger.expenses() {
        let month = pivot.entry(tx.month()).or_default();
        *month.categories.entry(tx.category.clone()).or_default() += tx.amount;
        month.total += tx.amount;
    }
    pivot
}

pub fn category_totals(ledger: &Ledger) -> CategoryTotals {
    let mut totals = CategoryTotals::new();
    for tx in ledger.expenses() {
        *totals.entry(tx.category.clone()).or_default() += tx.amount;
    }
    totals
}

/// Highest-spend categories, largest first (ties broken by name)
pub fn top_categories(ledger: &Ledger, limit: usize) -> Vec<(String, Decimal)> {
    let mut ranked: Vec<(String, Decimal)> = category_totals(ledger).into_iter().collect();
    // BTreeMap order already sorts names, and sort_by is stable
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);
    ranked
}

/// Each category's percentage of total expenses
pub fn expense_distribution(ledger: &Ledger) -> Vec<CategoryShare> {
    let totals = category_totals(ledger);
    let grand_total: Decimal = totals.values().copied().sum();

    totals
        .into_iter()
        .map(|(category, amount)| {
            let percent = if grand_total.is_zero() {
                0.0
            } else {
                (amount / grand_total * Decimal::ONE_HUNDRED)
                    .to_f64()
                    .unwrap_or(0.0)
            };
            CategoryShare {
                category,
                amount,
                percent,
            }
        })
        .collect()
}

/// Total expense for one category in one month, matching case-insensitively
pub fn spend_for(ledger: &Ledger, category: &str, month: MonthBucket) -> Decimal {
    let category = category.to_lowercase();
    ledger
        .expenses()
        .filter(|tx| tx.month() == month && tx.category.to_lowercase() == category)
        .map(|tx| tx.amount)
        .sum()
}
