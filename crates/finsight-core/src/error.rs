//! Error types for finsight

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A data row could not be normalized; `row` is its 1-based file line
    #[error("Malformed row at line {row}: {reason}")]
    MalformedRow { row: usize, reason: String },

    /// A required ledger column is absent from the header
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Any failure from the language-model advisor
    #[error("Advisor error: {0}")]
    Advisor(String),

    #[error("Please enter a question")]
    EmptyQuestion,

    #[error("Invalid budget: {0}")]
    InvalidBudget(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    /// Whether this error came from the advisor rather than the ledger
    pub fn is_advisor(&self) -> bool {
        matches!(self, Error::Advisor(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
