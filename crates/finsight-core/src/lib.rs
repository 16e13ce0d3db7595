//! Finsight Core Library
//!
//! Shared functionality for the finsight personal finance dashboard:
//! - CSV ledger import and normalization
//! - Spending reports (totals, monthly summary, category pivot)
//! - Budget alerts against per-category monthly limits
//! - Keyword query interpreter for spend questions
//! - Pluggable local language-model backends (Ollama, llama.cpp, etc.)
//! - Prompt library for customizable advisor prompts
//! - Chart specifications and the dashboard snapshot

pub mod advisor;
pub mod ai;
pub mod alerts;
pub mod budget;
pub mod charts;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod import;
pub mod ledger;
pub mod models;
pub mod prompts;
pub mod query;
pub mod reports;

/// Test utilities including mock completion server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use advisor::{Advisor, InsightSummary};
pub use ai::{AIBackend, AIClient, MockBackend, OllamaBackend, OpenAICompatibleBackend};
pub use alerts::{describe_alert, evaluate_budgets};
pub use budget::{parse_budget_override, BudgetSet, DEFAULT_CATEGORY_BUDGET};
pub use charts::{BarChartSpec, ChartSeries, PieChartSpec, PieSlice};
pub use config::{AdvisorConfig, BackendKind, Config};
pub use dashboard::{Dashboard, DashboardTotals};
pub use error::{Error, Result};
pub use format::format_currency;
pub use import::{parse_csv, read_ledger};
pub use ledger::Ledger;
pub use models::{Alert, Answer, BudgetReport, MonthBucket, QueryIntent, Transaction, TransactionType};
pub use prompts::{Prompt, PromptId, PromptInfo, PromptLibrary};
pub use query::{describe_answer, CategorySynonymTable, CategorySynonyms, MonthKeywordTable, QueryInterpreter};
