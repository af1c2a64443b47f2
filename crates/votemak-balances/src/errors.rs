use thiserror::Error;
use votemak_merkle::{Account, ParseAccountError};

pub type BalanceResult<T> = Result<T, BalanceError>;

#[derive(Error, Debug)]
pub enum BalanceError {
    #[error(transparent)]
    InvalidAddress(#[from] ParseAccountError),

    #[error("Duplicate address: {0}")]
    DuplicateAddress(Account),

    #[error("Invalid amount for account: {account} ({raw:?}: {reason})")]
    InvalidAmount {
        account: String,
        raw: String,
        reason: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Schema validation error: {0}")]
    SchemaValidation(String),
}
