//! Error types for investboard-core
//!
//! Bad individual records never produce an error: the engine skips them and
//! logs. These errors cover caller input only, such as filter form values.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Date in neither accepted format
    InvalidDate,
    /// Month outside 1-12
    InvalidMonth,
    /// Amount is not a decimal number
    InvalidAmount,
    /// Unknown transaction type
    InvalidType,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::InvalidDate => write!(f, "INVALID_DATE"),
            ErrorCode::InvalidMonth => write!(f, "INVALID_MONTH"),
            ErrorCode::InvalidAmount => write!(f, "INVALID_AMOUNT"),
            ErrorCode::InvalidType => write!(f, "INVALID_TYPE"),
        }
    }
}

/// Main error type for investboard-core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid date: {input}")]
    InvalidDate { input: String },

    #[error("Invalid month: {input}")]
    InvalidMonth { input: String },

    #[error("Invalid amount: {input}")]
    InvalidAmount { input: String },

    #[error("Invalid transaction type: {input}")]
    InvalidType { input: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::InvalidDate { .. } => ErrorCode::InvalidDate,
            CoreError::InvalidMonth { .. } => ErrorCode::InvalidMonth,
            CoreError::InvalidAmount { .. } => ErrorCode::InvalidAmount,
            CoreError::InvalidType { .. } => ErrorCode::InvalidType,
        }
    }

    /// Hint for fixing the input
    pub fn suggestion(&self) -> &'static str {
        match self {
            CoreError::InvalidDate { .. } => "Use YYYY-MM-DD or DD/MM/YYYY.",
            CoreError::InvalidMonth { .. } => "Use a month number between 1 and 12.",
            CoreError::InvalidAmount { .. } => "Use a plain decimal number such as 150.25.",
            CoreError::InvalidType { .. } => "Use Entrada or Saída.",
        }
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;
