//! Error types for securevault.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for vault operations.
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Vault file not found: {0}")]
    VaultNotFound(PathBuf),

    #[error("Vault file already exists: {0}")]
    VaultExists(PathBuf),

    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    #[error("Invalid entry: {0}")]
    InvalidEntry(String),

    #[error("Vault is locked")]
    VaultLocked,

    #[error("Unlock failed - credential rejected")]
    UnlockFailed,

    #[error("Operation cancelled by user")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, VaultError>;
