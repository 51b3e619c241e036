//! Error types for the blockmap storage engine

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Key too long: {len} bytes (max {max})")]
    KeyTooLong { len: usize, max: usize },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Data corruption: {0}")]
    Corrupted(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Config(err.to_string())
    }
}
