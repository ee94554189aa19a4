//! OrderChain - An append-only proof-of-work ledger for supply-chain order events
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Core Ledger
//! - [`blockchain`] - Blocks, the ledger, order lookups and chain validation
//! - [`transaction`] - Order-event records and their digests
//! - [`merkle`] - Merkle root aggregation
//!
//! ## Consensus
//! - [`miner`] - Proof-of-work mining with cooperative cancellation
//!
//! ## Cryptography
//! - [`crypto`] - SHA-256 helpers and hex conversion
//!
//! ## Concurrency
//! - [`shared`] - Mutex-guarded ledger handle for concurrent callers
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod blockchain;
pub mod merkle;
pub mod transaction;

// ============================================================================
// Consensus & Mining
// ============================================================================
pub mod miner;

// ============================================================================
// Cryptography
// ============================================================================
pub mod crypto;

// ============================================================================
// Concurrency
// ============================================================================
pub mod shared;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;
