//! Configuration loading
//!
//! ## Configuration Resolution
//!
//! 1. An explicit path (`--config`), which must exist
//! 2. Override in the config dir (~/.config/finsight/config.toml)
//! 3. Embedded defaults (compiled into binary)
//!
//! Sections missing from a file keep their defaults. Advisor settings can be
//! overridden from the environment afterwards (see [`AdvisorConfig::apply_env`]).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::budget::{BudgetSet, DEFAULT_CATEGORY_BUDGET};
use crate::error::{Error, Result};
use crate::format::DEFAULT_CURRENCY;
use crate::ledger::Ledger;
use crate::query::{CategorySynonymTable, CategorySynonyms};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/finsight.toml");

/// Default completion length for advisor calls
pub const DEFAULT_MAX_TOKENS: u32 = 512;

/// Which completion backend the advisor talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Ollama,
    OpenAICompatible,
    Mock,
}

impl BackendKind {
    /// Parse a backend name, accepting the usual aliases for OpenAI-style servers
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Some(Self::Ollama),
            "openai_compatible" | "openai" | "vllm" | "localai" | "llamacpp" | "llama_cpp" => {
                Some(Self::OpenAICompatible)
            }
            "mock" => Some(Self::Mock),
            _ => None,
        }
    }
}

/// `[advisor]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvisorConfig {
    pub backend: BackendKind,
    pub host: Option<String>,
    pub model: Option<String>,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub max_tokens: u32,
    /// Per-request timeout; `None` waits indefinitely
    pub timeout_secs: Option<u64>,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Ollama,
            host: Some("http://localhost:11434".to_string()),
            model: None,
            api_key: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: None,
        }
    }
}

impl AdvisorConfig {
    /// Apply `AI_BACKEND`, `OLLAMA_*` and `OPENAI_COMPATIBLE_*` overrides
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup
    ///
    /// Switching backends through `AI_BACKEND` drops the file's host, model
    /// and key, since they belong to the other server.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup("AI_BACKEND") {
            match BackendKind::parse(&name) {
                Some(kind) if kind != self.backend => {
                    self.backend = kind;
                    self.host = None;
                    self.model = None;
                    self.api_key = None;
                }
                Some(_) => {}
                None => {
                    tracing::warn!(backend = %name, "Unknown AI_BACKEND, keeping configured backend")
                }
            }
        }

        match self.backend {
            BackendKind::Ollama => {
                if let Some(host) = lookup("OLLAMA_HOST") {
                    self.host = Some(host);
                }
                if let Some(model) = lookup("OLLAMA_MODEL") {
                    self.model = Some(model);
                }
            }
            BackendKind::OpenAICompatible => {
                if let Some(host) = lookup("OPENAI_COMPATIBLE_HOST") {
                    self.host = Some(host);
                }
                if let Some(model) = lookup("OPENAI_COMPATIBLE_MODEL") {
                    self.model = Some(model);
                }
                if let Some(key) = lookup("OPENAI_COMPATIBLE_API_KEY") {
                    self.api_key = Some(key);
                }
            }
            BackendKind::Mock => {}
        }
    }
}

/// `[budgets]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetConfig {
    /// Pre-filled budget for each expense category in the ledger
    pub default: Decimal,
    /// Explicit per-category budgets
    pub categories: BTreeMap<String, Decimal>,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            default: Decimal::from(DEFAULT_CATEGORY_BUDGET),
            categories: BTreeMap::new(),
        }
    }
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    pub currency: String,
    pub budgets: BudgetConfig,
    pub advisor: AdvisorConfig,
    pub categories: Vec<CategorySynonyms>,
    /// File the config was read from; `None` for embedded defaults
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            budgets: BudgetConfig::default(),
            advisor: AdvisorConfig::default(),
            categories: CategorySynonymTable::default().entries().to_vec(),
            source: None,
        }
    }
}

impl Config {
    /// Resolve, parse and apply environment overrides
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = load_config(explicit)?;
        config.advisor.apply_env();
        Ok(config)
    }

    /// Parse config from TOML content (no environment overrides)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        parse_config(content)
    }

    /// Synonym table for the query interpreter
    pub fn synonym_table(&self) -> CategorySynonymTable {
        CategorySynonymTable::new(self.categories.clone())
    }

    /// Budget set for a ledger: explicit budgets first, then the default
    /// for every other expense category
    pub fn budget_set(&self, ledger: &Ledger) -> Result<BudgetSet> {
        let mut set = BudgetSet::new(self.budgets.default);
        for (category, amount) in &self.budgets.categories {
            set.set(category.clone(), *amount)?;
        }
        set.seed(ledger);
        Ok(set)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("finsight").join("config.toml"))
}

/// Load configuration (explicit path, then override, then default)
fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        return read_config(path);
    }

    if let Some(default_path) = default_config_path() {
        if default_path.exists() {
            return read_config(&default_path);
        }
    }

    debug!("Using embedded default config");
    parse_config(DEFAULT_CONFIG)
}

fn read_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
    let mut config = parse_config(&content)?;
    config.source = Some(path.to_path_buf());
    debug!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    display: Option<RawDisplay>,
    budgets: Option<RawBudgets>,
    advisor: Option<RawAdvisor>,
    categories: Option<Vec<CategorySynonyms>>,
}

#[derive(Debug, Deserialize)]
struct RawDisplay {
    currency: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawBudgets {
    default: Option<Decimal>,
    categories: Option<BTreeMap<String, Decimal>>,
}

#[derive(Debug, Deserialize)]
struct RawAdvisor {
    backend: Option<String>,
    host: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
    max_tokens: Option<u32>,
    timeout_secs: Option<u64>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<Config> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = Config::default();

    if let Some(currency) = raw.display.and_then(|d| d.currency) {
        config.currency = currency;
    }

    if let Some(budgets) = raw.budgets {
        if let Some(default) = budgets.default {
            if default.is_sign_negative() && !default.is_zero() {
                return Err(Error::Config(format!(
                    "budgets.default must not be negative: {}",
                    default
                )));
            }
            config.budgets.default = default;
        }
        if let Some(categories) = budgets.categories {
            config.budgets.categories = categories;
        }
    }

    if let Some(advisor) = raw.advisor {
        if let Some(name) = advisor.backend {
            config.advisor.backend = BackendKind::parse(&name)
                .ok_or_else(|| Error::Config(format!("Unknown advisor backend: {}", name)))?;
        }
        // An explicit section replaces the default host
        config.advisor.host = advisor.host;
        config.advisor.model = advisor.model;
        config.advisor.api_key = advisor.api_key;
        if let Some(max_tokens) = advisor.max_tokens {
            if max_tokens == 0 {
                return Err(Error::Config("advisor.max_tokens must be positive".into()));
            }
            config.advisor.max_tokens = max_tokens;
        }
        config.advisor.timeout_secs = advisor.timeout_secs;
    }

    if let Some(categories) = raw.categories {
        for entry in &categories {
            validate_category(entry)?;
        }
        if !categories.is_empty() {
            config.categories = categories;
        }
    }

    Ok(config)
}

/// A blank synonym is a substring of every question, so it is rejected
fn validate_category(entry: &CategorySynonyms) -> Result<()> {
    if entry.name.trim().is_empty() {
        return Err(Error::Config("categories entry has an empty name".into()));
    }
    if entry.synonyms.is_empty() {
        return Err(Error::Config(format!(
            "category {} has no synonyms",
            entry.name
        )));
    }
    if entry.synonyms.iter().any(|s| s.trim().is_empty()) {
        return Err(Error::Config(format!(
            "category {} has a blank synonym",
            entry.name
        )));
    }
    Ok(())
}
