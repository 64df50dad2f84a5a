use thiserror::Error;

use crate::domain::ParseAmountError;

/// Recoverable ledger errors. Neither one changes state; both are meant to be
/// shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("There are no transactions to clear")]
    NothingToClear,
}

impl From<ParseAmountError> for AppError {
    fn from(err: ParseAmountError) -> Self {
        AppError::InvalidAmount(err.to_string())
    }
}
