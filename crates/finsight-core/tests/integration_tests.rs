//! Integration tests for finsight-core
//!
//! These tests exercise the full import → report → alert → query workflow.

use finsight_core::{
    alerts::{describe_alert, evaluate_budgets},
    import::parse_csv,
    reports::{monthly_category_pivot, monthly_summary, totals_by_type},
    AIClient, Advisor, Answer, BudgetReport, BudgetSet, Config, Dashboard, Error, Ledger,
    MockBackend, MonthKeywordTable, PromptLibrary, QueryInterpreter,
};
use rust_decimal::Decimal;

/// Five months of a student-style budget in the sample dataset's layout
fn sample_csv() -> &'static str {
    r#"Date,Amount,Type,Category
2025-01-01,30000,Income,Salary
2025-01-03,1000,Expense,Food
2025-01-12,200,Expense,Food
2025-01-15,8000,Expense,Rent
2025-01-20,650,Expense,Travel
2025-02-01,30000,Income,Salary
2025-02-04,2400,Expense,Food
2025-02-15,8000,Expense,Rent
2025-02-22,5600,Expense,Shopping
2025-03-01,30000,Income,Salary
2025-03-10,1800,Expense,Food
2025-03-15,8000,Expense,Rent
2025-03-18,900,Expense,Entertainment
2025-04-01,30000,Income,Salary
2025-04-05,1500,Income,Freelance
2025-04-15,8000,Expense,Rent
2025-04-28,1200,Expense,Utilities
2025-05-01,30000,Income,Salary
2025-05-09,2100,Expense,Food
2025-05-15,8000,Expense,Rent
"#
}

fn ledger() -> Ledger {
    parse_csv(sample_csv().as_bytes()).expect("Failed to parse CSV")
}

fn mock_advisor(mock: &MockBackend) -> Advisor {
    Advisor::new(AIClient::Mock(mock.clone())).with_prompts(PromptLibrary::embedded_only())
}

// =============================================================================
// Reports
// =============================================================================

#[test]
fn test_import_and_reports() {
    let ledger = ledger();
    assert_eq!(ledger.len(), 20);
    assert_eq!(ledger.months().len(), 5);

    let totals = totals_by_type(&ledger);
    assert_eq!(totals.income, Decimal::from(151500));
    assert_eq!(totals.expense, Decimal::from(55850));

    let summary = monthly_summary(&ledger);
    let nets: Decimal = summary.values().map(|m| m.net).sum();
    assert_eq!(nets, totals.net());

    let pivot = monthly_category_pivot(&ledger);
    assert_eq!(pivot.len(), 5);
    for row in pivot.values() {
        assert_eq!(row.total, row.categories.values().copied().sum::<Decimal>());
    }
}

// =============================================================================
// Alerts
// =============================================================================

#[test]
fn test_default_budgets_flag_rent_and_shopping() {
    let ledger = ledger();
    let budgets = BudgetSet::for_ledger(&ledger, Decimal::from(5000));
    let report = evaluate_budgets(&ledger, &budgets);

    let flagged: Vec<String> = report
        .alerts()
        .iter()
        .map(|a| format!("{} {}", a.month, a.category))
        .collect();
    assert_eq!(
        flagged,
        vec![
            "2025-01 Rent",
            "2025-02 Rent",
            "2025-02 Shopping",
            "2025-03 Rent",
            "2025-04 Rent",
            "2025-05 Rent",
        ]
    );
    assert_eq!(
        describe_alert(&report.alerts()[2], "₹"),
        "Shopping exceeded budget in February 2025: ₹5,600 > ₹5,000"
    );
}

#[test]
fn test_generous_budgets_are_clean() {
    let ledger = ledger();
    let config = Config::from_toml_str(
        r#"
[budgets]
default = 6000

[budgets.categories]
Rent = 8000
"#,
    )
    .unwrap();
    let budgets = config.budget_set(&ledger).unwrap();
    assert_eq!(evaluate_budgets(&ledger, &budgets), BudgetReport::NoOverspending);
}

// =============================================================================
// Query interpreter
// =============================================================================

#[tokio::test]
async fn test_question_answered_from_ledger() {
    let ledger = ledger();
    let mock = MockBackend::new();
    let interpreter = QueryInterpreter::for_ledger(&ledger);

    let answer = interpreter
        .answer(
            &ledger,
            "How much did I spend on food in the 1st month?",
            &mock_advisor(&mock),
        )
        .await
        .unwrap();
    assert!(matches!(answer, Answer::Spend { amount, .. } if amount == Decimal::from(1200)));

    let answer = interpreter
        .answer(&ledger, "groceries last month", &mock_advisor(&mock))
        .await
        .unwrap();
    assert!(matches!(answer, Answer::Spend { amount, .. } if amount == Decimal::from(2100)));

    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn test_open_question_goes_to_advisor() {
    let ledger = ledger();
    let mock = MockBackend::with_reply("Consider an index fund SIP.");
    let interpreter = QueryInterpreter::for_ledger(&ledger);

    let answer = interpreter
        .answer(&ledger, "What should I invest in?", &mock_advisor(&mock))
        .await
        .unwrap();
    assert_eq!(
        answer,
        Answer::Advice {
            text: "Consider an index fund SIP.".into()
        }
    );
    assert_eq!(mock.calls(), 1);
    assert!(mock.prompts()[0].contains("User Question: What should I invest in?"));
}

#[tokio::test]
async fn test_advisor_failure_does_not_poison_session() {
    let ledger = ledger();
    let failing = MockBackend::failing("model not loaded");
    let interpreter = QueryInterpreter::new(
        Config::default().synonym_table(),
        MonthKeywordTable::for_ledger(&ledger),
    );

    let err = interpreter
        .answer(&ledger, "What should I invest in?", &mock_advisor(&failing))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Advisor(_)));

    // Ledger-backed answers still work afterwards
    let answer = interpreter
        .answer(&ledger, "rent in the 2nd month", &mock_advisor(&failing))
        .await
        .unwrap();
    assert!(matches!(answer, Answer::Spend { amount, .. } if amount == Decimal::from(8000)));
}

// =============================================================================
// Dashboard and insights
// =============================================================================

#[tokio::test]
async fn test_insights_prompt_reflects_ledger() {
    let mock = MockBackend::with_reply("You save about 62% of income.");
    let text = mock_advisor(&mock).insights(&ledger()).await.unwrap();
    assert_eq!(text, "You save about 62% of income.");

    let prompts = mock.prompts();
    let prompt = &prompts[0];
    assert!(prompt.contains("- Total income: ₹151,500"));
    assert!(prompt.contains("Rent (₹40,000)"));
}

#[test]
fn test_dashboard_serializes() {
    let ledger = ledger();
    let budgets = BudgetSet::for_ledger(&ledger, Decimal::from(5000));
    let dashboard = Dashboard::build(&ledger, &budgets);

    let json = serde_json::to_value(&dashboard).unwrap();
    assert_eq!(json["transaction_count"], 20);
    assert_eq!(json["income_expense_chart"]["categories"][4], "2025-05");
    assert_eq!(json["budget_report"]["alerts"].as_array().unwrap().len(), 6);
}
