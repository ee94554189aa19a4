//! Proof-of-work mining
//!
//! The search starts at the block's current nonce and increments until the
//! block hash has at least `difficulty` leading zero hex characters. It is
//! unbounded; callers that need bounded latency pick a low difficulty or
//! pass a [`CancelFlag`].

use crate::blockchain::Block;
use crate::error::{ChainError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

pub const DEFAULT_CANCEL_CHECK_INTERVAL: u64 = 1024;

/// Thread-safe flag used to stop an in-progress search.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Once triggered the flag remains set.
    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Miner {
    cancel_check_interval: u64,
}

impl Default for Miner {
    fn default() -> Self {
        Miner::new(DEFAULT_CANCEL_CHECK_INTERVAL)
    }
}

impl Miner {
    /// `cancel_check_interval` is how many attempts run between cancellation
    /// checks; zero is treated as one.
    pub fn new(cancel_check_interval: u64) -> Self {
        Miner {
            cancel_check_interval: cancel_check_interval.max(1),
        }
    }

    pub fn cancel_check_interval(&self) -> u64 {
        self.cancel_check_interval
    }

    pub fn mine(&self, block: Block) -> Result<Block> {
        self.search(block, None)
    }

    pub fn mine_with_cancel(&self, block: Block, cancel: &CancelFlag) -> Result<Block> {
        self.search(block, Some(cancel))
    }

    fn search(&self, mut block: Block, cancel: Option<&CancelFlag>) -> Result<Block> {
        let start = Instant::now();
        let mut attempts: u64 = 0;

        while !block.meets_difficulty() {
            if let Some(cancel) = cancel {
                if attempts % self.cancel_check_interval == 0 && cancel.is_triggered() {
                    debug!("Mining cancelled after {} attempts", attempts);
                    return Err(ChainError::MiningCancelled);
                }
            }
            let nonce = block
                .nonce()
                .checked_add(1)
                .ok_or(ChainError::NonceExhausted)?;
            block.set_nonce(nonce);
            attempts += 1;
        }

        info!(
            "Block mined: {} (nonce {}, {} attempts, {:.3}s)",
            block.hash_str(),
            block.nonce(),
            attempts,
            start.elapsed().as_secs_f64()
        );
        Ok(block)
    }
}

/// Mine `block` with the default miner.
pub fn mine_block(block: Block) -> Result<Block> {
    Miner::default().mine(block)
}
