use thiserror::Error;

/// Problems with the persisted transaction table
#[derive(Error, Debug)]
pub enum DataError {
    #[error("transaction table is empty or has no header row")]
    EmptyTable,

    #[error("line {line}: {message}")]
    Row { line: u64, message: String },

    #[error("duplicate transaction id {0}")]
    DuplicateId(String),

    #[error("amount total overflows for {0}")]
    AmountOverflow(String),
}

/// Invalid filter or configuration values supplied by the caller
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unrecognized granularity '{0}' (expected D, W or M)")]
    Granularity(String),

    #[error("unrecognized transaction type '{0}' (expected all, credit or debit)")]
    TransactionType(String),

    #[error("invalid date '{0}'")]
    Date(String),

    #[error("invalid config file: {0}")]
    File(String),
}

/// Failures while producing synthetic records
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("unique value pool exhausted after {attempts} attempts for pattern '{pattern}'")]
    UniquenessExhausted { pattern: String, attempts: usize },
}

/// Failures of the optional reference API call
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("credential environment variable '{0}' is not set")]
    MissingCredential(String),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Crate-level error
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
