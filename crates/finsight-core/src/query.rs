//! Rule-based interpretation of free-text finance questions
//!
//! A question is lower-cased and scanned for a category synonym and a month
//! keyword. When both are found the answer comes straight from the ledger;
//! otherwise the question goes to the advisor.
//!
//! Matching is plain substring search, so a longer word that happens to
//! contain a synonym still matches ("scar" contains "car", "refund" contains
//! "fun"). That imprecision is part of the contract: both tables are ordered
//! and the first hit wins.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::advisor::Advisor;
use crate::error::{Error, Result};
use crate::format::format_currency;
use crate::ledger::Ledger;
use crate::models::{Answer, MonthBucket, QueryIntent};
use crate::reports::spend_for;

/// A canonical category and the keywords that point to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySynonyms {
    pub name: String,
    pub synonyms: Vec<String>,
}

/// Ordered canonical categories with their synonyms
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySynonymTable {
    entries: Vec<CategorySynonyms>,
}

impl CategorySynonymTable {
    /// Build a table, lower-casing every name and synonym
    pub fn new(entries: Vec<CategorySynonyms>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| CategorySynonyms {
                name: entry.name.to_lowercase(),
                synonyms: entry.synonyms.iter().map(|s| s.to_lowercase()).collect(),
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[CategorySynonyms] {
        &self.entries
    }

    /// First canonical category (declared order) with a synonym in `text`
    ///
    /// `text` must already be lower-case.
    pub fn find(&self, text: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.synonyms.iter().any(|word| text.contains(word.as_str())))
            .map(|entry| entry.name.as_str())
    }
}

impl Default for CategorySynonymTable {
    fn default() -> Self {
        let table: [(&str, &[&str]); 9] = [
            (
                "education",
                &["education", "tuition", "learning", "courses", "school", "college", "books"],
            ),
            (
                "entertainment",
                &["entertainment", "fun", "leisure", "movies", "netflix", "gaming", "recreation"],
            ),
            (
                "food",
                &["food", "groceries", "eating", "dining", "meals", "snacks", "restaurants", "cafe"],
            ),
            (
                "travel",
                &[
                    "travel",
                    "transportation",
                    "commute",
                    "taxi",
                    "uber",
                    "bus",
                    "train",
                    "flight",
                    "ride",
                    "car",
                ],
            ),
            (
                "utilities",
                &[
                    "utilities",
                    "bills",
                    "electricity",
                    "water",
                    "internet",
                    "gas",
                    "mobile",
                    "phone",
                    "recharge",
                    "wifi",
                ],
            ),
            (
                "health",
                &["health", "medical", "doctor", "hospital", "medicine", "pharmacy", "clinic"],
            ),
            (
                "shopping",
                &["shopping", "clothes", "apparel", "fashion", "online shopping", "amazon", "flipkart"],
            ),
            ("rent", &["rent", "housing", "apartment", "flat", "room", "lease"]),
            ("others", &["others", "miscellaneous", "other", "etc"]),
        ];

        Self::new(
            table
                .iter()
                .map(|(name, synonyms)| CategorySynonyms {
                    name: name.to_string(),
                    synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
                })
                .collect(),
        )
    }
}

/// Ordered relative-month phrases resolved to concrete months
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonthKeywordTable {
    entries: Vec<(String, MonthBucket)>,
}

impl MonthKeywordTable {
    pub fn new<K: Into<String>>(entries: impl IntoIterator<Item = (K, MonthBucket)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(key, month)| (key.into().to_lowercase(), month))
                .collect(),
        }
    }

    /// Keywords for a ledger's date range
    ///
    /// Each distinct month gets an ordinal ("1st", "2nd", ...) in ascending
    /// order, followed by "last" for the most recent month.
    pub fn for_ledger(ledger: &Ledger) -> Self {
        let months = ledger.months();
        let mut entries: Vec<(String, MonthBucket)> = months
            .iter()
            .enumerate()
            .map(|(i, month)| (ordinal(i + 1), *month))
            .collect();
        if let Some(latest) = months.last() {
            entries.push(("last".to_string(), *latest));
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[(String, MonthBucket)] {
        &self.entries
    }

    /// First keyword (declared order) contained in `text`
    ///
    /// `text` must already be lower-case.
    pub fn find(&self, text: &str) -> Option<MonthBucket> {
        self.entries
            .iter()
            .find(|(key, _)| text.contains(key.as_str()))
            .map(|(_, month)| *month)
    }
}

fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

/// Resolves questions against injected keyword tables
#[derive(Debug, Clone)]
pub struct QueryInterpreter {
    synonyms: CategorySynonymTable,
    months: MonthKeywordTable,
}

impl QueryInterpreter {
    pub fn new(synonyms: CategorySynonymTable, months: MonthKeywordTable) -> Self {
        Self { synonyms, months }
    }

    /// Interpreter with the default synonyms and month keywords for `ledger`
    pub fn for_ledger(ledger: &Ledger) -> Self {
        Self::new(
            CategorySynonymTable::default(),
            MonthKeywordTable::for_ledger(ledger),
        )
    }

    pub fn synonyms(&self) -> &CategorySynonymTable {
        &self.synonyms
    }

    pub fn months(&self) -> &MonthKeywordTable {
        &self.months
    }

    /// Pull a (category, month) pair out of a question
    pub fn extract(&self, question: &str) -> QueryIntent {
        let text = question.to_lowercase();
        QueryIntent {
            category: self.synonyms.find(&text).map(str::to_string),
            month: self.months.find(&text),
        }
    }

    /// Deterministic answer when both category and month resolve
    pub fn answer_from_ledger(&self, ledger: &Ledger, question: &str) -> Option<Answer> {
        let intent = self.extract(question);
        debug!(
            category = intent.category.as_deref().unwrap_or("none"),
            month = %intent.month.map(|m| m.to_string()).unwrap_or_else(|| "none".into()),
            "Query intent"
        );

        let (category, month) = intent.resolved()?;
        Some(Answer::Spend {
            category: category.to_string(),
            month,
            amount: spend_for(ledger, category, month),
        })
    }

    /// Answer a question from the ledger, or fall back to the advisor
    ///
    /// Advisor failures come back as `Error::Advisor`.
    pub async fn answer(&self, ledger: &Ledger, question: &str, advisor: &Advisor) -> Result<Answer> {
        if question.trim().is_empty() {
            return Err(Error::EmptyQuestion);
        }

        if let Some(answer) = self.answer_from_ledger(ledger, question) {
            return Ok(answer);
        }

        let text = advisor.ask(question).await?;
        Ok(Answer::Advice { text })
    }
}

/// User-facing text for an answer, e.g.
/// `You spent ₹1,200 on Food in 2025-01.`
pub fn describe_answer(answer: &Answer, currency: &str) -> String {
    match answer {
        Answer::Spend {
            category,
            month,
            amount,
        } => format!(
            "You spent {} on {} in {}.",
            format_currency(*amount, currency),
            capitalize(category),
            month
        ),
        Answer::Advice { text } => text.clone(),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AIClient, MockBackend};
    use crate::prompts::PromptLibrary;
    use rust_decimal::Decimal;

    fn month(s: &str) -> MonthBucket {
        s.parse().unwrap()
    }

    fn interpreter() -> QueryInterpreter {
        QueryInterpreter::new(
            CategorySynonymTable::default(),
            MonthKeywordTable::new([("1st", month("2025-01")), ("last", month("2025-05"))]),
        )
    }

    #[test]
    fn test_extract_category_and_month() {
        let intent = interpreter().extract("How much did I spend on FOOD in the 1st month?");
        assert_eq!(intent.category.as_deref(), Some("food"));
        assert_eq!(intent.month, Some(month("2025-01")));
    }

    #[test]
    fn test_extract_synonym() {
        let intent = interpreter().extract("what did groceries cost last month");
        assert_eq!(intent.category.as_deref(), Some("food"));
        assert_eq!(intent.month, Some(month("2025-05")));
    }

    #[test]
    fn test_extract_nothing() {
        let intent = interpreter().extract("What should I invest in?");
        assert_eq!(intent, QueryIntent::default());
    }

    #[test]
    fn test_first_declared_category_wins() {
        // "movies" is entertainment, "books" is education; education is declared first
        let intent = interpreter().extract("movies or books?");
        assert_eq!(intent.category.as_deref(), Some("education"));
    }

    #[test]
    fn test_substring_false_positive_is_kept() {
        // "card" contains the travel synonym "car"
        let intent = interpreter().extract("why was my card declined");
        assert_eq!(intent.category.as_deref(), Some("travel"));

        // "refund" contains the entertainment synonym "fun"
        let intent = interpreter().extract("where did my refund go");
        assert_eq!(intent.category.as_deref(), Some("entertainment"));
    }

    #[test]
    fn test_ordinal() {
        let got: Vec<String> = [1, 2, 3, 4, 11, 12, 13, 21, 22, 23, 101, 111]
            .iter()
            .map(|n| ordinal(*n))
            .collect();
        assert_eq!(
            got,
            vec!["1st", "2nd", "3rd", "4th", "11th", "12th", "13th", "21st", "22nd", "23rd", "101st", "111th"]
        );
    }

    #[test]
    fn test_month_table_for_ledger() {
        let ledger = crate::import::parse_csv(
            "Date,Amount,Type,Category
2025-03-02,10,Expense,Food
2025-01-05,10,Expense,Food
2025-02-05,10,Income,Salary
"
            .as_bytes(),
        )
        .unwrap();
        let table = MonthKeywordTable::for_ledger(&ledger);
        let keys: Vec<(&str, String)> = table
            .entries()
            .iter()
            .map(|(k, m)| (k.as_str(), m.to_string()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("1st", "2025-01".to_string()),
                ("2nd", "2025-02".to_string()),
                ("3rd", "2025-03".to_string()),
                ("last", "2025-03".to_string()),
            ]
        );
    }

    fn food_ledger() -> Ledger {
        crate::import::parse_csv(
            "Date,Amount,Type,Category
2025-01-05,1000,Expense,Food
2025-01-10,200,Expense,Food
2025-05-02,90,Expense,Food
"
            .as_bytes(),
        )
        .unwrap()
    }

    #[test]
    fn test_answer_from_ledger_needs_both_parts() {
        let ledger = food_ledger();
        assert_eq!(
            interpreter().answer_from_ledger(&ledger, "food in the 1st month"),
            Some(Answer::Spend {
                category: "food".into(),
                month: month("2025-01"),
                amount: Decimal::from(1200),
            })
        );
        assert_eq!(interpreter().answer_from_ledger(&ledger, "food?"), None);
        assert_eq!(interpreter().answer_from_ledger(&ledger, "last month?"), None);
    }

    fn mock_advisor(mock: &MockBackend) -> Advisor {
        Advisor::new(AIClient::Mock(mock.clone())).with_prompts(PromptLibrary::embedded_only())
    }

    #[tokio::test]
    async fn test_answer_from_ledger_skips_advisor() {
        let mock = MockBackend::new();
        let answer = interpreter()
            .answer(
                &food_ledger(),
                "How much did I spend on food in the 1st month?",
                &mock_advisor(&mock),
            )
            .await
            .unwrap();

        assert_eq!(
            answer,
            Answer::Spend {
                category: "food".into(),
                month: month("2025-01"),
                amount: Decimal::from(1200),
            }
        );
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_answer_resolved_but_no_rows_is_zero() {
        let mock = MockBackend::new();
        let answer = interpreter()
            .answer(&food_ledger(), "rent last month?", &mock_advisor(&mock))
            .await
            .unwrap();
        assert!(matches!(answer, Answer::Spend { amount, .. } if amount.is_zero()));
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_unresolved_question_goes_to_advisor() {
        let mock = MockBackend::with_reply("Index funds are a common start.");
        let answer = interpreter()
            .answer(&food_ledger(), "What should I invest in?", &mock_advisor(&mock))
            .await
            .unwrap();
        assert_eq!(
            answer,
            Answer::Advice {
                text: "Index funds are a common start.".into()
            }
        );
        assert_eq!(mock.calls(), 1);

        // Category without a month is not enough
        interpreter()
            .answer(&food_ledger(), "How much on food?", &mock_advisor(&mock))
            .await
            .unwrap();
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn test_advisor_failure_is_reported() {
        let mock = MockBackend::failing("connection refused");
        let err = interpreter()
            .answer(&food_ledger(), "What should I invest in?", &mock_advisor(&mock))
            .await
            .unwrap_err();
        assert!(err.is_advisor());
    }

    #[tokio::test]
    async fn test_blank_question_rejected() {
        let mock = MockBackend::new();
        let err = interpreter()
            .answer(&food_ledger(), "  \t ", &mock_advisor(&mock))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EmptyQuestion));
        assert_eq!(mock.calls(), 0);
    }

    #[test]
    fn test_describe_answer() {
        let spend = Answer::Spend {
            category: "food".into(),
            month: month("2025-01"),
            amount: Decimal::from(1200),
        };
        assert_eq!(
            describe_answer(&spend, "₹"),
            "You spent ₹1,200 on Food in 2025-01."
        );

        let advice = Answer::Advice {
            text: "Cook at home.".into(),
        };
        assert_eq!(describe_answer(&advice, "₹"), "Cook at home.");
        assert_eq!(capitalize("eNTERTAINMENT"), "Entertainment");
    }

    #[test]
    fn test_synonym_table_lowercases() {
        let table = CategorySynonymTable::new(vec![CategorySynonyms {
            name: "Pets".into(),
            synonyms: vec!["Vet".into()],
        }]);
        assert_eq!(table.find("trip to the vet"), Some("pets"));
    }
}
