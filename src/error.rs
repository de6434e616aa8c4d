//! Error types for the deployment CLI

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("secret recovery failed: {0}")]
    SecretRecovery(String),

    #[error("unknown network: {0}")]
    UnknownNetwork(String),

    #[error("missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("gas estimation failed: {0}")]
    GasEstimation(String),

    #[error("transaction submission failed: {0}")]
    TransactionSubmission(String),

    /// Operator declined a confirmation prompt. Deliberate abort, not a
    /// defect; the CLI reports it separately from error paths.
    #[error("operation cancelled by the operator")]
    Cancelled,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("contract artifact error: {0}")]
    Artifact(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
