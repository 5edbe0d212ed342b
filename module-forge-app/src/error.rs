use thiserror::Error;
use wfc_core::WfcError;
use wfc_rules::{LoadError, RuleError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Catalog Error: {0}")]
    Catalog(#[from] LoadError),

    #[error("Rule Error: {0}")]
    Rules(#[from] RuleError),

    #[error("WFC Core Error: {0}")]
    WfcCore(#[from] WfcError),

    /// Every allowed attempt ended in a contradiction.
    #[error("No attempt out of {attempts} succeeded; last error: {last}")]
    AttemptsExhausted { attempts: u32, last: WfcError },

    #[error("Output Error: {0}")]
    Output(String),

    #[error("Run cancelled")]
    Cancelled,

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
