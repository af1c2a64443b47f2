use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Balance(#[from] votemak_balances::BalanceError),

    #[error(transparent)]
    Distribution(#[from] votemak_sdk::DistributionError),

    #[error(transparent)]
    Lookup(#[from] votemak_sdk::LookupError),

    #[error(transparent)]
    InvalidAddress(#[from] votemak_merkle::ParseAccountError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{path}: {source}")]
    File {
        path: String,
        #[source]
        source: Box<CliError>,
    },

    #[error("Validation failed with {0} mismatches")]
    ValidationFailed(usize),

    #[error("Command execution failed: {0}")]
    CommandExecution(String),
}
