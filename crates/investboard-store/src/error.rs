//! Error types for investboard-store

use investboard_core::CoreError;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StoreErrorCode {
    NotFound,
    DuplicateId,
    InvalidRecord,
    MalformedFile,
    IoError,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Transaction {id} not found")]
    NotFound { id: i64 },

    #[error("Transaction id {id} already exists")]
    DuplicateId { id: i64 },

    #[error("Invalid transaction: {0}")]
    InvalidRecord(#[from] CoreError),

    #[error("Malformed transaction file {path}: {source}")]
    MalformedFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error")]
    IoError(#[from] io::Error),
}

impl StoreError {
    pub fn code(&self) -> StoreErrorCode {
        match self {
            StoreError::NotFound { .. } => StoreErrorCode::NotFound,
            StoreError::DuplicateId { .. } => StoreErrorCode::DuplicateId,
            StoreError::InvalidRecord(_) => StoreErrorCode::InvalidRecord,
            StoreError::MalformedFile { .. } => StoreErrorCode::MalformedFile,
            StoreError::IoError(_) => StoreErrorCode::IoError,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
