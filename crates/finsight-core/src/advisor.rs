//! Language-model advisor
//!
//! Builds prompts from the ledger or a user question and sends them to the
//! configured completion backend. Every failure, whether unreachable server,
//! bad response or broken prompt override, comes back as [`Error::Advisor`]
//! so callers can show it and carry on.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use crate::ai::{AIBackend, AIClient};
use crate::config::{Config, DEFAULT_MAX_TOKENS};
use crate::error::{Error, Result};
use crate::format::{format_currency, DEFAULT_CURRENCY};
use crate::ledger::Ledger;
use crate::prompts::{PromptId, PromptLibrary};
use crate::reports::{top_categories, totals_by_type};

/// How many categories the insights prompt lists
const TOP_CATEGORY_COUNT: usize = 3;

/// Figures the insights prompt is built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsightSummary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub net_savings: Decimal,
    pub top_categories: Vec<(String, Decimal)>,
}

impl InsightSummary {
    pub fn from_ledger(ledger: &Ledger) -> Self {
        let totals = totals_by_type(ledger);
        Self {
            total_income: totals.income,
            total_expense: totals.expense,
            net_savings: totals.net(),
            top_categories: top_categories(ledger, TOP_CATEGORY_COUNT),
        }
    }
}

/// Completion client plus the prompts and limits used with it
#[derive(Clone)]
pub struct Advisor {
    client: AIClient,
    prompts: Arc<RwLock<PromptLibrary>>,
    max_tokens: u32,
    currency: String,
}

impl Advisor {
    /// Advisor with default prompts, 512 max tokens and rupee display
    pub fn new(client: AIClient) -> Self {
        Self {
            client,
            prompts: Arc::new(RwLock::new(PromptLibrary::new())),
            max_tokens: DEFAULT_MAX_TOKENS,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }

    /// Build from config; `None` when the backend has no host
    pub fn from_config(config: &Config) -> Option<Self> {
        let client = AIClient::from_config(&config.advisor)?;
        Some(
            Self::new(client)
                .with_max_tokens(config.advisor.max_tokens)
                .with_currency(&config.currency),
        )
    }

    pub fn with_prompts(mut self, prompts: PromptLibrary) -> Self {
        self.prompts = Arc::new(RwLock::new(prompts));
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_currency(mut self, currency: &str) -> Self {
        self.currency = currency.to_string();
        self
    }

    pub fn client(&self) -> &AIClient {
        &self.client
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// Prompt for whole-ledger advice
    pub fn render_insights_prompt(&self, ledger: &Ledger) -> Result<String> {
        let summary = InsightSummary::from_ledger(ledger);
        let total_income = format_currency(summary.total_income, &self.currency);
        let total_expense = format_currency(summary.total_expense, &self.currency);
        let net_savings = format_currency(summary.net_savings, &self.currency);
        let top = summary
            .top_categories
            .iter()
            .map(|(category, amount)| {
                format!("{} ({})", category, format_currency(*amount, &self.currency))
            })
            .collect::<Vec<_>>()
            .join(", ");

        let mut vars = HashMap::new();
        vars.insert("total_income", total_income.as_str());
        vars.insert("total_expense", total_expense.as_str());
        vars.insert("net_savings", net_savings.as_str());
        vars.insert("top_categories", top.as_str());
        vars.insert("currency", self.currency.as_str());

        self.render(PromptId::FinancialInsights, &vars)
    }

    /// Prompt for a free-form question
    pub fn render_question_prompt(&self, question: &str) -> Result<String> {
        let mut vars = HashMap::new();
        vars.insert("question", question.trim());
        vars.insert("currency", self.currency.as_str());

        self.render(PromptId::CustomQuestion, &vars)
    }

    fn render(&self, id: PromptId, vars: &HashMap<&str, &str>) -> Result<String> {
        let mut prompts = self
            .prompts
            .write()
            .map_err(|_| Error::InvalidData("Failed to acquire prompt library lock".into()))?;
        let template = prompts.get(id)?;
        Ok(template.render_completion(vars))
    }

    /// General advice from the ledger's totals and top categories
    pub async fn insights(&self, ledger: &Ledger) -> Result<String> {
        info!(backend = self.client.backend_name(), "Requesting financial insights");
        let prompt = self.render_insights_prompt(ledger).map_err(advisor_error)?;
        self.complete(&prompt).await
    }

    /// Answer a free-form personal finance question
    pub async fn ask(&self, question: &str) -> Result<String> {
        if question.trim().is_empty() {
            return Err(Error::EmptyQuestion);
        }
        info!(backend = self.client.backend_name(), "Sending question to advisor");
        let prompt = self.render_question_prompt(question).map_err(advisor_error)?;
        self.complete(&prompt).await
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        self.client
            .complete(prompt, self.max_tokens)
            .await
            .map_err(|e| {
                warn!(
                    model = self.client.model(),
                    host = self.client.host(),
                    error = %e,
                    "Advisor request failed"
                );
                advisor_error(e)
            })
    }
}

fn advisor_error(e: Error) -> Error {
    match e {
        Error::Advisor(_) => e,
        other => Error::Advisor(other.to_string()),
    }
}
