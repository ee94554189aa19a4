//! Error types for OrderChain

use std::fmt;
use thiserror::Error;

/// Kind of inconsistency found while re-validating a stored block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityFault {
    /// Stored Merkle root differs from the root recomputed from the transactions.
    MerkleRootMismatch,
    /// Stored block hash differs from the hash recomputed from the block content.
    HashMismatch,
    /// Block hash does not satisfy the block's own difficulty.
    InsufficientWork,
    /// Previous-hash field does not point at the preceding block (or the genesis sentinel).
    LinkageMismatch,
}

impl fmt::Display for IntegrityFault {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IntegrityFault::MerkleRootMismatch => write!(f, "Merkle root mismatch"),
            IntegrityFault::HashMismatch => write!(f, "hash mismatch"),
            IntegrityFault::InsufficientWork => write!(f, "insufficient proof of work"),
            IntegrityFault::LinkageMismatch => write!(f, "linkage mismatch"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("Empty transaction set")]
    EmptyTransactionSet,
    #[error("Stale chain tip: block builds on {expected} but the tip is now {actual}")]
    StaleChainTip { expected: String, actual: String },
    #[error("Integrity violation at block {index}: {fault}")]
    IntegrityViolation { index: usize, fault: IntegrityFault },
    #[error("Block difficulty {actual} does not match the ledger difficulty {expected}")]
    DifficultyMismatch { expected: u32, actual: u32 },
    #[error("Invalid difficulty {0} (maximum is 64 hex characters)")]
    InvalidDifficulty(u32),
    #[error("Block hash does not meet its difficulty target")]
    UnsolvedBlock,
    #[error("Mining cancelled")]
    MiningCancelled,
    #[error("Nonce space exhausted")]
    NonceExhausted,
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for ChainError {
    fn from(err: std::io::Error) -> Self {
        ChainError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ChainError {
    fn from(err: serde_json::Error) -> Self {
        ChainError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for ChainError {
    fn from(err: toml::de::Error) -> Self {
        ChainError::Config(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;
