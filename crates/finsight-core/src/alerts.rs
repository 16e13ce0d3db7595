//! Overspending alerts
//!
//! Compares each (month, category) expense total against the budget set.

use tracing::debug;

use crate::budget::BudgetSet;
use crate::format::format_currency;
use crate::ledger::Ledger;
use crate::models::{Alert, BudgetReport};
use crate::reports::monthly_category_pivot;

/// Evaluate every (month, category) pair against its budget
///
/// Alerts come out month ascending, then in the pivot's category order. A
/// pair alerts only when spend is strictly greater than its limit.
pub fn evaluate_budgets(ledger: &Ledger, budgets: &BudgetSet) -> BudgetReport {
    let mut alerts = Vec::new();

    for (month, row) in monthly_category_pivot(ledger) {
        for (category, spent) in row.categories {
            let budget = budgets.limit_for(&category);
            if spent > budget {
                alerts.push(Alert {
                    category,
                    month,
                    spent,
                    budget,
                });
            }
        }
    }

    debug!(count = alerts.len(), "Budget evaluation complete");
    BudgetReport::from_alerts(alerts)
}

/// One-line description of an alert, e.g.
/// `Food exceeded budget in January 2025: ₹1,200 > ₹1,000`
pub fn describe_alert(alert: &Alert, currency: &str) -> String {
    format!(
        "{} exceeded budget in {}: {} > {}",
        alert.category,
        alert.month.long_label(),
        format_currency(alert.spent, currency),
        format_currency(alert.budget, currency)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::parse_csv;
    use rust_decimal::Decimal;

    fn food_ledger() -> Ledger {
        parse_csv(
            "Date,Amount,Type,Category
2025-01-05,1000,Expense,Food
2025-01-10,200,Expense,Food
"
            .as_bytes(),
        )
        .unwrap()
    }

    #[test]
    fn test_single_alert_when_over_budget() {
        let mut budgets = BudgetSet::default();
        budgets.set("Food", Decimal::from(1000)).unwrap();

        let report = evaluate_budgets(&food_ledger(), &budgets);
        let alerts = report.alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].category, "Food");
        assert_eq!(alerts[0].month.to_string(), "2025-01");
        assert_eq!(alerts[0].spent, Decimal::from(1200));
        assert_eq!(alerts[0].budget, Decimal::from(1000));
    }

    #[test]
    fn test_no_overspending_is_explicit() {
        let mut budgets = BudgetSet::default();
        budgets.set("Food", Decimal::from(2000)).unwrap();

        let report = evaluate_budgets(&food_ledger(), &budgets);
        assert_eq!(report, BudgetReport::NoOverspending);
    }

    #[test]
    fn test_spend_equal_to_budget_does_not_alert() {
        let mut budgets = BudgetSet::default();
        budgets.set("Food", Decimal::from(1200)).unwrap();
        assert!(evaluate_budgets(&food_ledger(), &budgets).is_clean());
    }

    #[test]
    fn test_unbudgeted_category_alerts_against_zero() {
        let report = evaluate_budgets(&food_ledger(), &BudgetSet::default());
        assert_eq!(report.alerts().len(), 1);
        assert_eq!(report.alerts()[0].budget, Decimal::ZERO);
    }

    #[test]
    fn test_alert_order_is_month_then_category() {
        let ledger = parse_csv(
            "Date,Amount,Type,Category
2025-02-01,10,Expense,Travel
2025-01-02,10,Expense,Rent
2025-01-01,10,Expense,Food
"
            .as_bytes(),
        )
        .unwrap();
        let report = evaluate_budgets(&ledger, &BudgetSet::default());
        let order: Vec<(String, String)> = report
            .alerts()
            .iter()
            .map(|a| (a.month.to_string(), a.category.clone()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("2025-01".to_string(), "Food".to_string()),
                ("2025-01".to_string(), "Rent".to_string()),
                ("2025-02".to_string(), "Travel".to_string()),
            ]
        );
    }

    #[test]
    fn test_describe_alert() {
        let mut budgets = BudgetSet::default();
        budgets.set("Food", Decimal::from(1000)).unwrap();
        let report = evaluate_budgets(&food_ledger(), &budgets);
        assert_eq!(
            describe_alert(&report.alerts()[0], "₹"),
            "Food exceeded budget in January 2025: ₹1,200 > ₹1,000"
        );
    }
}
