//! The normalized, date-sorted transaction ledger for one session

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{MonthBucket, Transaction};

/// Transactions sorted ascending by date
///
/// Rows sharing a date keep their input order. The ledger is read-only once
/// built; derived tables are recomputed from it rather than patched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new(mut transactions: Vec<Transaction>) -> Self {
        transactions.sort_by_key(|tx| tx.date);
        Self { transactions }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter()
    }

    pub fn expenses(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(|tx| tx.is_expense())
    }

    /// Distinct month buckets, ascending
    pub fn months(&self) -> Vec<MonthBucket> {
        let mut months: Vec<MonthBucket> = self.transactions.iter().map(|tx| tx.month()).collect();
        months.dedup();
        months
    }

    /// Distinct expense categories in order of first appearance
    pub fn expense_categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for tx in self.expenses() {
            if !seen.contains(&tx.category.as_str()) {
                seen.push(&tx.category);
            }
        }
        seen
    }

    /// First and last transaction dates
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.transactions.first()?;
        let last = self.transactions.last()?;
        Some((first.date, last.date))
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.transactions.iter()
    }
}
