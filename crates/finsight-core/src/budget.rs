//! Per-category monthly budgets

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::ledger::Ledger;

/// Budget amount pre-filled for each newly seen expense category
pub const DEFAULT_CATEGORY_BUDGET: i64 = 5000;

/// Category -> monthly budget, with a fallback for new categories
///
/// `default_budget` is what a newly seen category starts with when the set is
/// seeded from a ledger. A category the set has never seen at all has a
/// limit of zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetSet {
    budgets: BTreeMap<String, Decimal>,
    default_budget: Decimal,
}

impl Default for BudgetSet {
    fn default() -> Self {
        Self::new(Decimal::from(DEFAULT_CATEGORY_BUDGET))
    }
}

impl BudgetSet {
    /// Empty set with the given default for newly seen categories
    pub fn new(default_budget: Decimal) -> Self {
        Self {
            budgets: BTreeMap::new(),
            default_budget: default_budget.max(Decimal::ZERO),
        }
    }

    /// Seed every expense category in the ledger with the default budget
    pub fn for_ledger(ledger: &Ledger, default_budget: Decimal) -> Self {
        let mut set = Self::new(default_budget);
        set.seed(ledger);
        set
    }

    /// Add the default budget for categories not yet present
    ///
    /// Existing entries are left untouched.
    pub fn seed(&mut self, ledger: &Ledger) {
        for category in ledger.expense_categories() {
            self.budgets
                .entry(category.to_string())
                .or_insert(self.default_budget);
        }
    }

    /// Set a category's budget, rejecting negative amounts
    pub fn set(&mut self, category: impl Into<String>, amount: Decimal) -> Result<()> {
        let category = category.into();
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(Error::InvalidBudget(format!(
                "budget for {} must not be negative: {}",
                category, amount
            )));
        }
        self.budgets.insert(category, amount);
        Ok(())
    }

    pub fn get(&self, category: &str) -> Option<Decimal> {
        self.budgets.get(category).copied()
    }

    /// Limit used for alerting: the stored budget, or zero if unseen
    pub fn limit_for(&self, category: &str) -> Decimal {
        self.get(category).unwrap_or(Decimal::ZERO)
    }

    pub fn default_budget(&self) -> Decimal {
        self.default_budget
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.budgets.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.budgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.budgets.is_empty()
    }
}

/// Parse a `CATEGORY=AMOUNT` budget override
pub fn parse_budget_override(s: &str) -> Result<(String, Decimal)> {
    let (category, amount) = s
        .split_once('=')
        .ok_or_else(|| Error::InvalidBudget(format!("expected CATEGORY=AMOUNT, got {}", s)))?;

    let category = category.trim();
    if category.is_empty() {
        return Err(Error::InvalidBudget(format!("missing category in {}", s)));
    }

    let amount: Decimal = amount
        .trim()
        .parse()
        .map_err(|_| Error::InvalidBudget(format!("amount is not numeric in {}", s)))?;

    Ok((category.to_string(), amount))
}
