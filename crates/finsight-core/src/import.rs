//! Ledger CSV import
//!
//! Expects a header row containing `Date`, `Amount`, `Type` and `Category` in
//! any order. Extra columns are ignored. A single bad row fails the whole
//! import; no partial ledger is produced.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{Error, Result};
use crate::ledger::Ledger;
use crate::models::{Transaction, TransactionType};

const DATE_COLUMN: &str = "Date";
const AMOUNT_COLUMN: &str = "Amount";
const TYPE_COLUMN: &str = "Type";
const CATEGORY_COLUMN: &str = "Category";

/// Column positions resolved from the header row
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    date: usize,
    amount: usize,
    kind: usize,
    category: usize,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
                .ok_or_else(|| Error::MissingColumn(name.to_string()))
        };

        Ok(Self {
            date: find(DATE_COLUMN)?,
            amount: find(AMOUNT_COLUMN)?,
            kind: find(TYPE_COLUMN)?,
            category: find(CATEGORY_COLUMN)?,
        })
    }
}

/// Read and normalize a ledger file from disk
pub fn read_ledger(path: &Path) -> Result<Ledger> {
    let file = File::open(path)?;
    parse_csv(file)
}

/// Parse CSV data into a date-sorted ledger
pub fn parse_csv<R: Read>(reader: R) -> Result<Ledger> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut transactions = Vec::new();
    // Every later sum is bounded by this one, so aggregation cannot overflow
    let mut ledger_total = Decimal::ZERO;

    for (index, result) in rdr.records().enumerate() {
        let record = result?;
        // File line (header is line 1); csv drops blank lines silently
        let row = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(index + 2);

        // Skip fully blank lines rather than reporting them as malformed
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let tx = parse_record(&record, &columns, row)?;
        ledger_total = ledger_total
            .checked_add(tx.amount)
            .ok_or_else(|| Error::MalformedRow {
                row,
                reason: "amount overflows ledger total".to_string(),
            })?;
        transactions.push(tx);
    }

    debug!("Parsed {} ledger transactions", transactions.len());
    Ok(Ledger::new(transactions))
}

fn parse_record(record: &StringRecord, columns: &ColumnMap, row: usize) -> Result<Transaction> {
    let field = |idx: usize, name: &str| {
        record.get(idx).ok_or_else(|| Error::MalformedRow {
            row,
            reason: format!("missing value for {}", name),
        })
    };

    let date_str = field(columns.date, DATE_COLUMN)?;
    let date = parse_date(date_str).ok_or_else(|| Error::MalformedRow {
        row,
        reason: format!("unable to parse date: {}", date_str),
    })?;

    let amount_str = field(columns.amount, AMOUNT_COLUMN)?;
    let amount = parse_amount(amount_str).ok_or_else(|| Error::MalformedRow {
        row,
        reason: format!("amount is not numeric: {}", amount_str),
    })?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(Error::MalformedRow {
            row,
            reason: format!("amount must not be negative: {}", amount_str),
        });
    }

    let kind_str = field(columns.kind, TYPE_COLUMN)?;
    let kind = TransactionType::from_str(kind_str)
        .map_err(|reason| Error::MalformedRow { row, reason })?;

    let category = field(columns.category, CATEGORY_COLUMN)?;

    Ok(Transaction::new(date, amount, kind, category))
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d",  // 2025-01-15
        "%Y/%m/%d",  // 2025/01/15
        "%m/%d/%Y",  // 01/15/2025
        "%m/%d/%y",  // 01/15/25
        "%m-%d-%Y",  // 01-15-2025
        "%d-%m-%Y",  // 15-01-2025
        "%d/%m/%Y",  // 15/01/2025 (European)
        "%d %b %Y",  // 15 Jan 2025
        "%b %d, %Y", // Jan 15, 2025
    ];

    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    let datetime_formats = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    None
}

fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | '₹' | '€' | '£' | ',' | ' '))
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert_eq!(parse_date("2025-01-15"), Some(expected));
        assert_eq!(parse_date("01/15/2025"), Some(expected));
        assert_eq!(parse_date("01-15-2025"), Some(expected));
        assert_eq!(parse_date("15-01-2025"), Some(expected));
        assert_eq!(parse_date("15 Jan 2025"), Some(expected));
        assert_eq!(parse_date("2025-01-15 08:30:00"), Some(expected));
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,234.56"), Some(Decimal::new(123456, 2)));
        assert_eq!(parse_amount("₹5,000"), Some(Decimal::from(5000)));
        assert_eq!(parse_amount("$12"), Some(Decimal::from(12)));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn test_parse_csv_sorts_and_buckets() {
        let csv = "Date,Amount,Type,Category
2025-02-01,15000,Expense,Rent
2025-01-10,200,Expense,Food
2025-01-01,50000,Income,Salary
";
        let ledger = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(ledger.len(), 3);
        let first = &ledger.transactions()[0];
        assert_eq!(first.category, "Salary");
        assert_eq!(first.month().to_string(), "2025-01");
        assert_eq!(ledger.transactions()[2].month().to_string(), "2025-02");
    }

    #[test]
    fn test_parse_csv_any_column_order() {
        let csv = "Category,Type,Note,Amount,Date
Food,Expense,lunch,120.50,2025-01-05
";
        let ledger = parse_csv(csv.as_bytes()).unwrap();
        let tx = &ledger.transactions()[0];
        assert_eq!(tx.amount, Decimal::new(12050, 2));
        assert_eq!(tx.kind, TransactionType::Expense);
    }

    #[test]
    fn test_missing_column() {
        let csv = "Date,Amount,Category
2025-01-05,100,Food
";
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::MissingColumn(ref c) if c == "Type"));
    }

    #[test]
    fn test_malformed_date_is_fatal() {
        let csv = "Date,Amount,Type,Category
2025-01-05,100,Expense,Food
not-a-date,100,Expense,Food
";
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::MalformedRow { row: 3, .. }));
    }

    #[test]
    fn test_malformed_amount() {
        let csv = "Date,Amount,Type,Category
2025-01-05,lots,Expense,Food
";
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::MalformedRow { row: 2, .. }));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let csv = "Date,Amount,Type,Category
2025-01-05,-10,Expense,Food
";
        assert!(matches!(
            parse_csv(csv.as_bytes()),
            Err(Error::MalformedRow { .. })
        ));
    }

    #[test]
    fn test_unknown_type_rejected() {
        let csv = "Date,Amount,Type,Category
2025-01-05,10,Transfer,Food
";
        assert!(matches!(
            parse_csv(csv.as_bytes()),
            Err(Error::MalformedRow { .. })
        ));
    }

    #[test]
    fn test_blank_lines_skipped() {
        let csv = "Date,Amount,Type,Category
2025-01-05,10,Expense,Food
,,,
";
        let ledger = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_malformed_row_reports_file_line_past_blank_lines() {
        let csv = "Date,Amount,Type,Category
2025-01-05,10,Expense,Food

2025-01-06,ten,Expense,Food
";
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::MalformedRow { row: 4, .. }));
    }

    #[test]
    fn test_ledger_total_overflow_rejected() {
        let csv = "Date,Amount,Type,Category
2025-01-05,50000000000000000000000000000,Expense,Food
2025-01-06,50000000000000000000000000000,Expense,Food
";
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedRow { row: 3, ref reason } if reason.contains("overflows")
        ));
    }

    #[test]
    fn test_large_amounts_within_range_aggregate() {
        let csv = "Date,Amount,Type,Category
2025-01-01,30000000000000000000000000000,Income,Salary
2025-01-05,20000000000000000000000000000,Expense,Food
";
        let ledger = parse_csv(csv.as_bytes()).unwrap();
        let totals = crate::reports::totals_by_type(&ledger);
        assert_eq!(totals.net(), Decimal::from_str("10000000000000000000000000000").unwrap());
    }
}
