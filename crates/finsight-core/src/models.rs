//! Domain models for finsight

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

/// Whether money came in or went out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {} (valid: Income, Expense)", s)),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A year-month grouping key, displayed as `YYYY-MM`
///
/// Ordering is chronological (year first, then month).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthBucket {
    year: i32,
    month: u32,
}

impl MonthBucket {
    /// Create a bucket, returning None for a month outside 1..=12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Human label such as "January 2025"
    pub fn long_label(&self) -> String {
        const NAMES: [&str; 12] = [
            "January",
            "February",
            "March",
            "April",
            "May",
            "June",
            "July",
            "August",
            "September",
            "October",
            "November",
            "December",
        ];
        format!("{} {}", NAMES[(self.month - 1) as usize], self.year)
    }
}

impl fmt::Display for MonthBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthBucket {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| format!("Invalid month: {} (expected YYYY-MM)", s))?;
        let year: i32 = year
            .parse()
            .map_err(|_| format!("Invalid year in month: {}", s))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("Invalid month number in: {}", s))?;
        MonthBucket::new(year, month).ok_or_else(|| format!("Month out of range: {}", s))
    }
}

impl Serialize for MonthBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthBucket {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A single normalized ledger row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: String,
    /// Derived once from `date`; never reassigned
    month: MonthBucket,
}

impl Transaction {
    pub fn new(
        date: NaiveDate,
        amount: Decimal,
        kind: TransactionType,
        category: impl Into<String>,
    ) -> Self {
        Self {
            date,
            amount,
            kind,
            category: category.into(),
            month: MonthBucket::of(date),
        }
    }

    pub fn month(&self) -> MonthBucket {
        self.month
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }
}

/// An overspending alert for one (month, category) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub category: String,
    pub month: MonthBucket,
    pub spent: Decimal,
    pub budget: Decimal,
}

/// Outcome of a budget evaluation
///
/// A clean run is its own variant so callers must handle it explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "alerts", rename_all = "snake_case")]
pub enum BudgetReport {
    NoOverspending,
    Overspending(Vec<Alert>),
}

impl BudgetReport {
    pub fn from_alerts(alerts: Vec<Alert>) -> Self {
        if alerts.is_empty() {
            Self::NoOverspending
        } else {
            Self::Overspending(alerts)
        }
    }

    pub fn is_clean(&self) -> bool {
        matches!(self, Self::NoOverspending)
    }

    pub fn alerts(&self) -> &[Alert] {
        match self {
            Self::NoOverspending => &[],
            Self::Overspending(alerts) => alerts,
        }
    }
}

/// Category and month pulled out of a free-text question
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryIntent {
    pub category: Option<String>,
    pub month: Option<MonthBucket>,
}

impl QueryIntent {
    /// Both parts resolved, so the question can be answered from the ledger
    pub fn resolved(&self) -> Option<(&str, MonthBucket)> {
        match (&self.category, self.month) {
            (Some(category), Some(month)) => Some((category.as_str(), month)),
            _ => None,
        }
    }
}

/// Answer to a custom question
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Answer {
    /// Deterministic spend lookup
    Spend {
        category: String,
        month: MonthBucket,
        amount: Decimal,
    },
    /// Prose from the advisor, verbatim
    Advice { text: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_from_str() {
        assert_eq!(
            "Income".parse::<TransactionType>().unwrap(),
            TransactionType::Income
        );
        assert_eq!(
            " expense ".parse::<TransactionType>().unwrap(),
            TransactionType::Expense
        );
        assert!("Transfer".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_month_bucket_display_and_parse() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        let month = MonthBucket::of(date);
        assert_eq!(month.to_string(), "2025-01");
        assert_eq!("2025-01".parse::<MonthBucket>().unwrap(), month);
        assert!("2025-13".parse::<MonthBucket>().is_err());
        assert!("January".parse::<MonthBucket>().is_err());
    }

    #[test]
    fn test_month_bucket_ordering() {
        let dec = MonthBucket::new(2024, 12).unwrap();
        let jan = MonthBucket::new(2025, 1).unwrap();
        assert!(dec < jan);
    }

    #[test]
    fn test_month_long_label() {
        assert_eq!(MonthBucket::new(2025, 1).unwrap().long_label(), "January 2025");
        assert_eq!(
            MonthBucket::new(2024, 12).unwrap().long_label(),
            "December 2024"
        );
    }

    #[test]
    fn test_transaction_derives_month() {
        let tx = Transaction::new(
            NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            Decimal::from(10),
            TransactionType::Expense,
            "Food",
        );
        assert_eq!(tx.month().to_string(), "2025-03");
        assert!(tx.is_expense());
    }

    #[test]
    fn test_budget_report_clean_state() {
        assert!(BudgetReport::from_alerts(vec![]).is_clean());
        assert!(BudgetReport::NoOverspending.alerts().is_empty());
    }

    #[test]
    fn test_query_intent_resolved() {
        let intent = QueryIntent {
            category: Some("food".into()),
            month: None,
        };
        assert!(intent.resolved().is_none());
    }
}
